//! Weapon command handlers.

use tabled::Tabled;

use grimdarkly_core::{
    Catalog, FilterField, PageSort, RecordKind, SearchPhase, SearchResults, SortDirection,
    SortState, Weapon, WeaponAbility, WeaponSortKey,
};

use crate::cli::{OutputFormat, WeaponSearchArgs, WeaponsArgs, WeaponsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, Painter};

use super::{search, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WeaponRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    wtype: String,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "A")]
    attacks: String,
    #[tabled(rename = "Skill")]
    skill: String,
    #[tabled(rename = "S")]
    strength: String,
    #[tabled(rename = "AP")]
    ap: String,
    #[tabled(rename = "D")]
    damage: String,
    #[tabled(rename = "Abilities")]
    abilities: String,
}

impl WeaponRow {
    fn new(w: &Weapon, expand: bool) -> Self {
        Self {
            id: w.id,
            name: w.name.clone(),
            wtype: w.weapon_type.to_string(),
            range: w.range_label(),
            attacks: w.attacks.clone(),
            skill: w.skill_label(),
            strength: w.strength.clone(),
            ap: w.ap_label(),
            damage: w.damage.clone(),
            abilities: util::capped_names(&w.abilities, expand, WeaponAbility::label),
        }
    }
}

fn detail(w: &Weapon, expand: bool, paint: Painter) -> String {
    let mut lines = vec![
        paint.heading(&w.name),
        format!("ID:        {}", w.id),
        format!("Type:      {}", w.weapon_type),
        format!("Range:     {}", w.range_label()),
        format!(
            "Profile:   A {}  Skill {}  S {}  AP {}  D {}",
            w.attacks,
            w.skill_label(),
            w.strength,
            w.ap_label(),
            w.damage
        ),
    ];

    if !w.abilities.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Abilities"));
        lines.push(util::capped_names(&w.abilities, expand, |a| paint.accent(&a.label())));
    }

    if !w.units.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Units"));
        lines.push(util::capped_names(&w.units, expand, |u| {
            format!("{} {}", u.name, paint.muted(&format!("({})", u.faction)))
        }));
    }

    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    catalog: &Catalog,
    args: WeaponsArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    match args.command {
        WeaponsCommand::Search(search_args) => search_weapons(catalog, &search_args, settings).await,

        WeaponsCommand::Get { weapon, expand } => {
            let found = catalog.find_weapon(&weapon).await?;
            let paint = Painter::new(settings.color);
            let out = output::render_single(
                settings.output,
                &found,
                |w| detail(w, expand, paint),
                |w| w.name.clone(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}

async fn search_weapons(
    catalog: &Catalog,
    args: &WeaponSearchArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let fields = [
        (FilterField::Name, args.name.as_deref()),
        (FilterField::WeaponType, args.weapon_type.as_deref()),
        (FilterField::MinRange, args.min_range.as_deref()),
        (FilterField::MaxRange, args.max_range.as_deref()),
        (FilterField::ArmorPenetration, args.ap.as_deref()),
        (FilterField::Attacks, args.attacks.as_deref()),
    ];
    let opts = &args.opts;
    let mut page = search::build_page(RecordKind::Weapon, &fields, opts, settings.quiet)?;

    let criteria = match opts.sort.as_deref() {
        Some(raw) => util::parse_sort_key::<WeaponSortKey>(raw)?,
        None => WeaponSortKey::default(),
    };
    let direction = if opts.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    page.set_sort(PageSort::Weapon(SortState::new(criteria, direction)));

    if !search::execute(&mut page, catalog, settings.quiet).await? {
        return Ok(());
    }

    let weapons = match page.sorted_results() {
        Some(SearchResults::Weapons(weapons)) => weapons,
        _ => Vec::new(),
    };
    if matches!(page.phase(), SearchPhase::NoResults) && settings.output == OutputFormat::Table {
        output::print_output(&page.status_line(), settings.quiet);
    } else {
        let out = output::render_list(
            settings.output,
            &weapons,
            |w| WeaponRow::new(w, opts.expand),
            |w| w.name.clone(),
        );
        output::print_output(&out, settings.quiet);
    }
    search::finish(&page, opts, settings.quiet);
    Ok(())
}
