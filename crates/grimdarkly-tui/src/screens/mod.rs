//! Screen implementations. Each screen is a top-level Component.

pub mod detail;
pub mod factions;
pub mod search;

use grimdarkly_core::RecordKind;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create every screen component, tabs and detail views alike.
pub fn create_screens(show_variants: bool) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Factions,
            Box::new(factions::FactionsScreen::new(show_variants)),
        ),
        (
            ScreenId::Units,
            Box::new(search::SearchScreen::new(RecordKind::Unit, show_variants)),
        ),
        (
            ScreenId::Weapons,
            Box::new(search::SearchScreen::new(RecordKind::Weapon, show_variants)),
        ),
        (
            ScreenId::UnitDetail,
            Box::new(detail::DetailScreen::new(RecordKind::Unit, show_variants)),
        ),
        (
            ScreenId::WeaponDetail,
            Box::new(detail::DetailScreen::new(RecordKind::Weapon, show_variants)),
        ),
    ]
}
