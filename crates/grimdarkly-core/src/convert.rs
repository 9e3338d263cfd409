// ── API-to-domain type conversions ──
//
// Bridges raw `grimdarkly_api::models` payloads into canonical domain
// types. Each `From` impl renames wire fields, parses closed-set strings
// into enums, and flags sub-faction keywords.

use grimdarkly_api::models as wire;

use crate::directory::is_sub_faction_name;
use crate::model::{
    Ability, Category, Composition, Configuration, Faction, Keyword, Unit, UnitOption, UnitRef,
    UnitType, Weapon, WeaponAbility, WeaponRef, WeaponType,
};

// ── Factions ───────────────────────────────────────────────────────

impl From<wire::Faction> for Faction {
    fn from(f: wire::Faction) -> Self {
        Self {
            id: f.id,
            name: f.name,
            category: Category {
                id: f.category.id,
                name: f.category.name,
            },
        }
    }
}

// ── Units ──────────────────────────────────────────────────────────

/// Unknown unit types fall back to `Other`.
fn parse_unit_type(raw: &str) -> UnitType {
    raw.parse().unwrap_or(UnitType::Other)
}

impl From<wire::KeywordTag> for Keyword {
    fn from(tag: wire::KeywordTag) -> Self {
        let is_sub_faction = tag.is_sub_faction() || is_sub_faction_name(tag.name());
        let name = match tag {
            wire::KeywordTag::Plain(name) | wire::KeywordTag::Flagged { name, .. } => name,
        };
        Self {
            name,
            is_sub_faction,
        }
    }
}

impl From<wire::Unit> for Unit {
    fn from(u: wire::Unit) -> Self {
        Self {
            id: u.id,
            name: u.name,
            movement: u.movement,
            toughness: u.toughness,
            save: u.save,
            wounds: u.wounds,
            leadership: u.leadership,
            objective_control: u.oc,
            unit_type: parse_unit_type(&u.unit_type),
            faction: u.faction.into(),
            weapons: u
                .weapons
                .into_iter()
                .map(|w| WeaponRef {
                    id: w.id,
                    name: w.name,
                })
                .collect(),
            abilities: u
                .unit_abilities
                .into_iter()
                .map(|a| Ability {
                    id: a.id,
                    name: a.name,
                    description: a.description,
                })
                .collect(),
            keywords: u.keywords.into_iter().map(Keyword::from).collect(),
            configurations: u
                .configurations
                .into_iter()
                .map(|c| Configuration {
                    id: c.id,
                    model_count: c.model_count,
                    description: c.description,
                    points: c.points,
                })
                .collect(),
            options: u
                .options
                .into_iter()
                .map(|o| UnitOption {
                    id: o.id,
                    line: o.line,
                    button: o.button,
                    description: o.description,
                })
                .collect(),
            compositions: u
                .compositions
                .into_iter()
                .map(|c| Composition {
                    id: c.id,
                    line: c.line,
                    description: c.description,
                    min_count: c.min_count,
                    max_count: c.max_count,
                    model_type: c.model_type,
                    is_alternative: c.is_alternative,
                })
                .collect(),
        }
    }
}

// ── Weapons ────────────────────────────────────────────────────────

impl From<wire::WeaponType> for WeaponType {
    fn from(t: wire::WeaponType) -> Self {
        match t {
            wire::WeaponType::Melee => Self::Melee,
            wire::WeaponType::Ranged => Self::Ranged,
        }
    }
}

impl From<wire::Weapon> for Weapon {
    fn from(w: wire::Weapon) -> Self {
        Self {
            id: w.id,
            name: w.name,
            weapon_type: w.weapon_type.into(),
            range: w.range,
            attacks: w.attacks,
            skill: w.skill,
            strength: w.strength,
            armor_penetration: w.ap,
            damage: w.damage,
            abilities: w
                .abilities
                .into_iter()
                .map(|a| WeaponAbility {
                    name: a.ability.name,
                    value: a.value,
                })
                .collect(),
            units: w
                .units
                .into_iter()
                .map(|u| UnitRef {
                    id: u.id,
                    name: u.name,
                    faction: u.faction,
                })
                .collect(),
        }
    }
}
