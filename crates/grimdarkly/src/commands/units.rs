//! Unit command handlers.

use tabled::Tabled;

use grimdarkly_core::presentation::{DEFAULT_TEXT_LIMIT, collapse_text};
use grimdarkly_core::{
    Catalog, FilterField, PageSort, RecordKind, SearchResults, SearchPhase, SortDirection,
    SortState, Unit, UnitSortKey,
};

use crate::cli::{OutputFormat, UnitSearchArgs, UnitsArgs, UnitsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output::{self, Painter};

use super::{search, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Faction")]
    faction: String,
    #[tabled(rename = "M")]
    movement: String,
    #[tabled(rename = "T")]
    toughness: i32,
    #[tabled(rename = "Sv")]
    save: String,
    #[tabled(rename = "W")]
    wounds: i32,
    #[tabled(rename = "Ld")]
    leadership: String,
    #[tabled(rename = "OC")]
    oc: i32,
    #[tabled(rename = "Pts")]
    points: String,
    #[tabled(rename = "Weapons")]
    weapons: String,
    #[tabled(rename = "Keywords")]
    keywords: String,
}

impl UnitRow {
    fn new(u: &Unit, expand: bool, show_variants: bool) -> Self {
        let keywords: Vec<_> = u.visible_keywords(show_variants).collect();
        Self {
            id: u.id,
            name: u.name.clone(),
            faction: u.faction.name.clone(),
            movement: movement(u),
            toughness: u.toughness,
            save: format!("{}+", u.save),
            wounds: u.wounds,
            leadership: format!("{}+", u.leadership),
            oc: u.objective_control,
            points: u.min_points().map_or_else(|| "-".into(), |p| p.to_string()),
            weapons: util::capped_names(&u.weapons, expand, |w| w.name.clone()),
            keywords: util::capped_names(&keywords, expand, |k| k.name.clone()),
        }
    }
}

fn movement(u: &Unit) -> String {
    u.movement.map_or_else(|| "-".into(), |m| format!("{m}\""))
}

fn detail(u: &Unit, expand: bool, show_variants: bool, paint: Painter) -> String {
    let mut lines = vec![
        paint.heading(&u.name),
        format!("ID:        {}", u.id),
        format!("Faction:   {} ({})", u.faction.name, u.faction.category.name),
        format!("Type:      {}", u.unit_type),
        format!(
            "Stats:     M {}  T {}  Sv {}+  W {}  Ld {}+  OC {}",
            movement(u),
            u.toughness,
            u.save,
            u.wounds,
            u.leadership,
            u.objective_control
        ),
    ];
    if let Some(points) = u.min_points() {
        lines.push(format!("Points:    from {points}"));
    }

    if !u.weapons.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Weapons"));
        lines.push(util::capped_names(&u.weapons, expand, |w| w.name.clone()));
    }

    if !u.abilities.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Abilities"));
        for a in &u.abilities {
            let text = match collapse_text(&a.description, DEFAULT_TEXT_LIMIT) {
                Some(short) if !expand => format!("{short} {}", paint.muted("[Read more: --expand]")),
                _ => a.description.clone(),
            };
            lines.push(format!("{}: {text}", paint.accent(&a.name)));
        }
    }

    let keywords: Vec<_> = u.visible_keywords(show_variants).collect();
    if !keywords.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Keywords"));
        lines.push(util::capped_names(&keywords, expand, |k| k.name.clone()));
    }

    if !u.configurations.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Configurations"));
        for c in &u.configurations {
            let models = if c.model_count == 1 { "model" } else { "models" };
            lines.push(format!("{} {models}: {} pts", c.model_count, c.points));
        }
    }

    if !u.compositions.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Composition"));
        for c in &u.compositions {
            let prefix = if c.is_alternative { "  or " } else { "- " };
            lines.push(format!("{prefix}{}", c.description));
        }
    }

    if expand && !u.options.is_empty() {
        lines.push(String::new());
        lines.push(paint.heading("Wargear options"));
        for o in &u.options {
            lines.push(format!("{}. {}", o.button, o.description));
        }
    }

    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(catalog: &Catalog, args: UnitsArgs, settings: &Settings) -> Result<(), CliError> {
    let show_variants = util::load_preferences().show_variants();

    match args.command {
        UnitsCommand::Search(search_args) => {
            search_units(catalog, &search_args, settings, show_variants).await
        }

        UnitsCommand::Get { unit, expand } => {
            let found = catalog.find_unit(&unit).await?;
            let paint = Painter::new(settings.color);
            let out = output::render_single(
                settings.output,
                &found,
                |u| detail(u, expand, show_variants, paint),
                |u| u.name.clone(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}

async fn search_units(
    catalog: &Catalog,
    args: &UnitSearchArgs,
    settings: &Settings,
    show_variants: bool,
) -> Result<(), CliError> {
    let fields = [
        (FilterField::Name, args.name.as_deref()),
        (FilterField::Faction, args.faction.as_deref()),
        (FilterField::UnitType, args.unit_type.as_deref()),
        (FilterField::MinToughness, args.min_toughness.as_deref()),
        (FilterField::MaxToughness, args.max_toughness.as_deref()),
        (FilterField::MinWounds, args.min_wounds.as_deref()),
        (FilterField::MaxWounds, args.max_wounds.as_deref()),
        (FilterField::MinMovement, args.min_movement.as_deref()),
        (FilterField::MaxMovement, args.max_movement.as_deref()),
    ];
    let opts = &args.opts;
    let mut page = search::build_page(RecordKind::Unit, &fields, opts, settings.quiet)?;

    let criteria = match opts.sort.as_deref() {
        Some(raw) => util::parse_sort_key::<UnitSortKey>(raw)?,
        None => UnitSortKey::default(),
    };
    let direction = if opts.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    page.set_sort(PageSort::Unit(SortState::new(criteria, direction)));

    if !search::execute(&mut page, catalog, settings.quiet).await? {
        return Ok(());
    }

    let units = match page.sorted_results() {
        Some(SearchResults::Units(units)) => units,
        _ => Vec::new(),
    };
    if matches!(page.phase(), SearchPhase::NoResults) && settings.output == OutputFormat::Table {
        output::print_output(&page.status_line(), settings.quiet);
    } else {
        let out = output::render_list(
            settings.output,
            &units,
            |u| UnitRow::new(u, opts.expand, show_variants),
            |u| u.name.clone(),
        );
        output::print_output(&out, settings.quiet);
    }
    search::finish(&page, opts, settings.quiet);
    Ok(())
}
