// ── Filter fields ──
//
// Closed set of filter inputs. Each field knows its query key, which record
// kind it applies to, and how its text is interpreted.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::model::RecordKind;

/// How a field's raw text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Free text, trimmed.
    Text,
    /// Integer; optionally signed.
    Integer { signed: bool },
    /// One of a closed set of names (unit or weapon type).
    Choice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize)]
pub enum FilterField {
    Name,
    Faction,
    UnitType,
    MinToughness,
    MaxToughness,
    MinWounds,
    MaxWounds,
    MinMovement,
    MaxMovement,
    WeaponType,
    MinRange,
    MaxRange,
    ArmorPenetration,
    Attacks,
}

impl FilterField {
    /// Query-string / wire key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Faction => "faction",
            Self::UnitType => "unitType",
            Self::MinToughness => "minToughness",
            Self::MaxToughness => "maxToughness",
            Self::MinWounds => "minWounds",
            Self::MaxWounds => "maxWounds",
            Self::MinMovement => "minMovement",
            Self::MaxMovement => "maxMovement",
            Self::WeaponType => "weaponType",
            Self::MinRange => "minRange",
            Self::MaxRange => "maxRange",
            Self::ArmorPenetration => "ap",
            Self::Attacks => "attacks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Faction => "Faction",
            Self::UnitType => "Unit Type",
            Self::MinToughness => "Min Toughness",
            Self::MaxToughness => "Max Toughness",
            Self::MinWounds => "Min Wounds",
            Self::MaxWounds => "Max Wounds",
            Self::MinMovement => "Min Movement",
            Self::MaxMovement => "Max Movement",
            Self::WeaponType => "Weapon Type",
            Self::MinRange => "Min Range",
            Self::MaxRange => "Max Range",
            Self::ArmorPenetration => "Armor Penetration",
            Self::Attacks => "Attacks",
        }
    }

    /// Look a field up by its query key (exact match).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::iter().find(|f| f.key() == key)
    }

    pub fn shape(self) -> FieldShape {
        match self {
            Self::Name | Self::Faction | Self::Attacks => FieldShape::Text,
            Self::UnitType | Self::WeaponType => FieldShape::Choice,
            Self::ArmorPenetration => FieldShape::Integer { signed: true },
            Self::MinToughness
            | Self::MaxToughness
            | Self::MinWounds
            | Self::MaxWounds
            | Self::MinMovement
            | Self::MaxMovement
            | Self::MinRange
            | Self::MaxRange => FieldShape::Integer { signed: false },
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self.shape(), FieldShape::Integer { .. })
    }

    pub fn allows_negative(self) -> bool {
        matches!(self.shape(), FieldShape::Integer { signed: true })
    }

    pub fn applies_to(self, kind: RecordKind) -> bool {
        match self {
            Self::Name => true,
            Self::Faction
            | Self::UnitType
            | Self::MinToughness
            | Self::MaxToughness
            | Self::MinWounds
            | Self::MaxWounds
            | Self::MinMovement
            | Self::MaxMovement => kind == RecordKind::Unit,
            Self::WeaponType
            | Self::MinRange
            | Self::MaxRange
            | Self::ArmorPenetration
            | Self::Attacks => kind == RecordKind::Weapon,
        }
    }

    /// Fields of a form, in display order.
    pub fn for_kind(kind: RecordKind) -> Vec<Self> {
        Self::iter().filter(|f| f.applies_to(kind)).collect()
    }

    /// Advisory `(min, max)` hint shown next to numeric inputs.
    /// Values outside the hint are still sent.
    pub fn range_hint(self) -> Option<(i32, i32)> {
        match self {
            Self::MinToughness | Self::MaxToughness => Some((1, 20)),
            Self::MinWounds | Self::MaxWounds => Some((1, 30)),
            Self::MinMovement | Self::MaxMovement => Some((0, 30)),
            Self::MinRange | Self::MaxRange => Some((0, 72)),
            Self::ArmorPenetration => Some((-6, 0)),
            _ => None,
        }
    }
}

/// Whether `text` is an acceptable in-progress value for a numeric field:
/// digits only, with one leading `-` when the field allows negatives.
/// Empty text is accepted (it unsets the field).
pub fn is_integer_text(text: &str, allow_negative: bool) -> bool {
    let digits = if allow_negative {
        text.strip_prefix('-').unwrap_or(text)
    } else {
        text
    };
    digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for field in FilterField::iter() {
            assert_eq!(FilterField::from_key(field.key()), Some(field));
        }
        assert_eq!(FilterField::from_key("keyword"), None);
        assert_eq!(FilterField::from_key("Name"), None);
    }

    #[test]
    fn only_ap_is_signed() {
        let signed: Vec<_> = FilterField::iter().filter(|f| f.allows_negative()).collect();
        assert_eq!(signed, vec![FilterField::ArmorPenetration]);
    }

    #[test]
    fn forms_split_by_kind() {
        let unit = FilterField::for_kind(RecordKind::Unit);
        assert!(unit.contains(&FilterField::MinToughness));
        assert!(!unit.contains(&FilterField::ArmorPenetration));
        let weapon = FilterField::for_kind(RecordKind::Weapon);
        assert_eq!(weapon.first(), Some(&FilterField::Name));
        assert!(weapon.contains(&FilterField::Attacks));
    }

    #[test]
    fn integer_pattern() {
        assert!(is_integer_text("", false));
        assert!(is_integer_text("12", false));
        assert!(!is_integer_text("-1", false));
        assert!(is_integer_text("-1", true));
        assert!(is_integer_text("-", true));
        assert!(!is_integer_text("1-", true));
        assert!(!is_integer_text("--1", true));
        assert!(!is_integer_text("1.5", true));
        assert!(!is_integer_text("a", false));
    }
}
