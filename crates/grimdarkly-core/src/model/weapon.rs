// ── Weapon domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

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
pub enum WeaponType {
    Melee,
    Ranged,
}

/// Named weapon rule, e.g. `Sustained Hits` with value `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponAbility {
    pub name: String,
    pub value: Option<String>,
}

impl WeaponAbility {
    pub fn label(&self) -> String {
        match self.value.as_deref() {
            Some(v) if !v.is_empty() => format!("{} {v}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Back-reference to a unit that carries the weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef {
    pub id: u32,
    pub name: String,
    pub faction: String,
}

/// A weapon profile. Dice-notation stats stay as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: u32,
    pub name: String,
    pub weapon_type: WeaponType,
    pub range: Option<i32>,
    pub attacks: String,
    pub skill: Option<i32>,
    pub strength: String,
    pub armor_penetration: i32,
    pub damage: String,
    pub abilities: Vec<WeaponAbility>,
    pub units: Vec<UnitRef>,
}

impl Weapon {
    /// Range column text: `Melee` for close-combat weapons, `24"` otherwise.
    pub fn range_label(&self) -> String {
        match (self.weapon_type, self.range) {
            (WeaponType::Melee, _) | (WeaponType::Ranged, None) => "Melee".into(),
            (WeaponType::Ranged, Some(r)) => format!("{r}\""),
        }
    }

    /// Skill column text, e.g. `3+`.
    pub fn skill_label(&self) -> String {
        self.skill.map_or_else(|| "N/A".into(), |s| format!("{s}+"))
    }

    /// AP column text: positive values get an explicit `+`.
    pub fn ap_label(&self) -> String {
        if self.armor_penetration > 0 {
            format!("+{}", self.armor_penetration)
        } else {
            self.armor_penetration.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(weapon_type: WeaponType, range: Option<i32>, ap: i32) -> Weapon {
        Weapon {
            id: 1,
            name: "Chainsword".into(),
            weapon_type,
            range,
            attacks: "4".into(),
            skill: Some(3),
            strength: "4".into(),
            armor_penetration: ap,
            damage: "1".into(),
            abilities: vec![],
            units: vec![],
        }
    }

    #[test]
    fn labels() {
        let melee = weapon(WeaponType::Melee, None, -1);
        assert_eq!(melee.range_label(), "Melee");
        assert_eq!(melee.ap_label(), "-1");
        assert_eq!(melee.skill_label(), "3+");

        let ranged = weapon(WeaponType::Ranged, Some(24), 1);
        assert_eq!(ranged.range_label(), "24\"");
        assert_eq!(ranged.ap_label(), "+1");
    }

    #[test]
    fn ability_label_includes_value() {
        let ability = WeaponAbility {
            name: "Sustained Hits".into(),
            value: Some("1".into()),
        };
        assert_eq!(ability.label(), "Sustained Hits 1");
    }
}
