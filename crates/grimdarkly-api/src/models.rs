// Wire types for the catalog API.
//
// Field names follow the JSON exactly (camelCase). These types are kept
// close to the payloads; `grimdarkly-core` converts them into domain models.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

// ── Envelope ─────────────────────────────────────────────────────────

/// `{ success, data, count?, meta?, error? }` wrapper around every payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub meta: Option<SearchMeta>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Strip the envelope, turning `success: false` or a missing `data`
    /// field into an error.
    pub fn into_data(self) -> Result<T, Error> {
        if !self.success {
            return Err(Error::Rejected {
                message: self
                    .error
                    .unwrap_or_else(|| "request was not successful".into()),
            });
        }
        self.data.ok_or_else(|| Error::Deserialization {
            message: "envelope is missing `data`".into(),
            body: String::new(),
        })
    }
}

/// Server echo of a search request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    #[serde(default)]
    pub search_params: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub name_terms: Vec<String>,
    #[serde(default)]
    pub count: u64,
}

// ── Factions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Faction {
    pub id: u32,
    pub name: String,
    pub category: Category,
}

// ── Units ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub movement: Option<i32>,
    pub toughness: i32,
    pub save: i32,
    pub wounds: i32,
    pub leadership: i32,
    pub oc: i32,
    pub unit_type: String,
    pub faction: Faction,
    #[serde(default)]
    pub weapons: Vec<WeaponReference>,
    #[serde(default)]
    pub unit_abilities: Vec<UnitAbility>,
    #[serde(default)]
    pub keywords: Vec<KeywordTag>,
    #[serde(default)]
    pub configurations: Vec<UnitConfiguration>,
    #[serde(default)]
    pub options: Vec<UnitOption>,
    #[serde(default)]
    pub compositions: Vec<UnitComposition>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeaponReference {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAbility {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Keywords arrive either as bare strings or as `{ name, isSubFaction }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeywordTag {
    Plain(String),
    #[serde(rename_all = "camelCase")]
    Flagged {
        name: String,
        #[serde(default)]
        is_sub_faction: bool,
    },
}

impl KeywordTag {
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) | Self::Flagged { name, .. } => name,
        }
    }

    pub fn is_sub_faction(&self) -> bool {
        matches!(
            self,
            Self::Flagged {
                is_sub_faction: true,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitConfiguration {
    pub id: u32,
    pub model_count: u32,
    #[serde(default)]
    pub description: String,
    pub points: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnitOption {
    pub id: u32,
    pub line: u32,
    #[serde(default)]
    pub button: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitComposition {
    pub id: u32,
    pub line: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub min_count: Option<u32>,
    #[serde(default)]
    pub max_count: Option<u32>,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub is_alternative: bool,
}

// ── Weapons ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeaponType {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub id: u32,
    pub name: String,
    pub weapon_type: WeaponType,
    #[serde(default)]
    pub range: Option<i32>,
    #[serde(deserialize_with = "string_or_number")]
    pub attacks: String,
    #[serde(default)]
    pub skill: Option<i32>,
    #[serde(deserialize_with = "string_or_number")]
    pub strength: String,
    pub ap: i32,
    #[serde(deserialize_with = "string_or_number")]
    pub damage: String,
    #[serde(default)]
    pub abilities: Vec<WeaponAbilityValue>,
    #[serde(default)]
    pub units: Vec<UnitReference>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeaponAbility {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeaponAbilityValue {
    #[serde(default)]
    pub value: Option<String>,
    pub ability: WeaponAbility,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnitReference {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub faction: String,
}

/// Dice-notation stats are strings, but plain numbers show up too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}
