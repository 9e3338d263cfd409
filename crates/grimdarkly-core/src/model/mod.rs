// ── Domain model ──
//
// Canonical catalog types consumed by the CLI and TUI. Built from the
// wire types in `grimdarkly_api::models` by the `convert` module.

pub mod faction;
pub mod unit;
pub mod weapon;

pub use faction::{Category, Faction};
pub use unit::{
    Ability, Composition, Configuration, Keyword, Unit, UnitOption, UnitType, WeaponRef,
};
pub use weapon::{UnitRef, Weapon, WeaponAbility, WeaponType};

/// Which record family a search, form, or page deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RecordKind {
    Unit,
    Weapon,
}

impl RecordKind {
    /// Singular noun for messages ("unit", "weapon").
    pub fn noun(self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Weapon => "weapon",
        }
    }
}
