// ── Unit domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::faction::Faction;

/// Battlefield role of a unit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitType {
    Character,
    Battleline,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub id: u32,
    pub name: String,
    pub description: String,
}

/// Keyword tag; sub-faction keywords narrow a parent faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    pub is_sub_faction: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: u32,
    pub model_count: u32,
    pub description: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOption {
    pub id: u32,
    pub line: u32,
    pub button: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub id: u32,
    pub line: u32,
    pub description: String,
    pub min_count: Option<u32>,
    pub max_count: Option<u32>,
    pub model_type: Option<String>,
    pub is_alternative: bool,
}

/// A datasheet entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: u32,
    pub name: String,
    pub movement: Option<i32>,
    pub toughness: i32,
    pub save: i32,
    pub wounds: i32,
    pub leadership: i32,
    pub objective_control: i32,
    pub unit_type: UnitType,
    pub faction: Faction,
    pub weapons: Vec<WeaponRef>,
    pub abilities: Vec<Ability>,
    pub keywords: Vec<Keyword>,
    pub configurations: Vec<Configuration>,
    pub options: Vec<UnitOption>,
    pub compositions: Vec<Composition>,
}

impl Unit {
    /// Cheapest configuration cost, if any configuration is listed.
    pub fn min_points(&self) -> Option<u32> {
        self.configurations.iter().map(|c| c.points).min()
    }

    /// Keywords, optionally hiding sub-faction tags.
    pub fn visible_keywords(&self, show_variants: bool) -> impl Iterator<Item = &Keyword> {
        self.keywords
            .iter()
            .filter(move |k| show_variants || !k.is_sub_faction)
    }
}
