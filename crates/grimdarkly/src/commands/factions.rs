//! Faction command handlers.

use tabled::Tabled;

use grimdarkly_core::{Catalog, FactionEntry, faction_directory};

use crate::cli::{FactionsArgs, FactionsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FactionRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Units query")]
    query: String,
}

impl From<&FactionEntry> for FactionRow {
    fn from(e: &FactionEntry) -> Self {
        Self {
            id: e.id,
            name: match &e.parent {
                Some(parent) => format!("{} ({parent})", e.name),
                None => e.name.clone(),
            },
            category: e.category.clone(),
            query: e.units_query(),
        }
    }
}

fn detail(e: &FactionEntry) -> String {
    let mut lines = vec![
        format!("ID:        {}", e.id),
        format!("Name:      {}", e.name),
        format!("Category:  {}", e.category),
    ];
    if let Some(parent) = &e.parent {
        lines.push(format!("Parent:    {parent}"));
    }
    lines.push(format!(
        "Units:     grimdarkly units search --query '{}'",
        e.units_query()
    ));
    lines.push(String::new());
    lines.push(e.description.clone());
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    catalog: &Catalog,
    args: FactionsArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    match args.command {
        FactionsCommand::List { no_variants } => {
            let show_variants = !no_variants && util::load_preferences().show_variants();
            let factions = catalog.factions().await?;
            let entries = faction_directory(&factions, show_variants);
            let out = output::render_list(
                settings.output,
                &entries,
                |e| FactionRow::from(e),
                |e| e.name.clone(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        FactionsCommand::Get { id } => {
            // Built-in sub-factions never come from the API.
            let built_in = faction_directory(&[], true).into_iter().find(|e| e.id == id);
            let entry = match built_in {
                Some(entry) => entry,
                None => FactionEntry::from(&catalog.faction(id).await?),
            };
            let out = output::render_single(settings.output, &entry, detail, |e| e.name.clone());
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sub_faction_rows_name_their_parent() {
        let entries = faction_directory(&[], true);
        let ultra = entries.iter().find(|e| e.name == "Ultramarines").unwrap();
        let row = FactionRow::from(ultra);
        assert_eq!(row.name, "Ultramarines (Space Marines)");
        assert_eq!(row.query, "?faction=Space+Marines&keyword=Ultramarines");
    }

    #[test]
    fn detail_ends_with_lore() {
        let entries = faction_directory(&[], true);
        let fists = entries.iter().find(|e| e.name == "Imperial Fists").unwrap();
        let text = detail(fists);
        assert!(text.contains("Parent:    Space Marines"));
        assert!(text.ends_with(&fists.description));
        assert!(text.contains("siege specialists"));
    }
}
