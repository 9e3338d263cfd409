// ── Sort engine ──
//
// Produces a freshly ordered copy of a fetched result list. The input is
// never reordered in place. Sorting is stable in both directions: equal
// keys keep their original relative order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::model::{Unit, Weapon};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// A per-kind sort criterion.
pub trait SortKey: Copy + Eq + Default + IntoEnumIterator + 'static {
    fn label(self) -> &'static str;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum UnitSortKey {
    #[default]
    Name,
    Faction,
    Movement,
    Toughness,
    Save,
    Wounds,
    Leadership,
    ObjectiveControl,
    Points,
}

impl SortKey for UnitSortKey {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Faction => "Faction",
            Self::Movement => "Movement",
            Self::Toughness => "Toughness",
            Self::Save => "Save",
            Self::Wounds => "Wounds",
            Self::Leadership => "Leadership",
            Self::ObjectiveControl => "OC",
            Self::Points => "Points",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WeaponSortKey {
    #[default]
    Name,
    Range,
    Attacks,
    Skill,
    Strength,
    ArmorPenetration,
    Damage,
}

impl SortKey for WeaponSortKey {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Range => "Range",
            Self::Attacks => "Attacks",
            Self::Skill => "Skill",
            Self::Strength => "Strength",
            Self::ArmorPenetration => "AP",
            Self::Damage => "Damage",
        }
    }
}

/// Criterion plus direction. Defaults to name, ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState<K> {
    pub criteria: K,
    pub direction: SortDirection,
}

impl<K: SortKey> SortState<K> {
    pub fn new(criteria: K, direction: SortDirection) -> Self {
        Self {
            criteria,
            direction,
        }
    }

    /// Switch criterion; the direction is kept.
    pub fn with_criteria(self, criteria: K) -> Self {
        Self { criteria, ..self }
    }

    pub fn toggled(self) -> Self {
        Self {
            direction: self.direction.toggled(),
            ..self
        }
    }

    /// Next criterion in declaration order, wrapping around.
    pub fn cycled(self) -> Self {
        let all: Vec<K> = K::iter().collect();
        let idx = all.iter().position(|k| *k == self.criteria).unwrap_or(0);
        let next = all.get((idx + 1) % all.len().max(1)).copied().unwrap_or_default();
        self.with_criteria(next)
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.criteria.label(), self.direction.arrow())
    }
}

/// Leading integer of a dice-notation stat, `0` when there is none.
///
/// `"2"` → 2, `"2D6"` → 2, `"D6"` → 0, `"D3+1"` → 0. Lossy on purpose: it
/// orders fixed values and treats random ones as zero rather than
/// estimating an average.
pub fn leading_integer(raw: &str) -> i64 {
    let s = raw.trim();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().map_or(0, |n| sign * n)
}

fn cmp_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare_units(a: &Unit, b: &Unit, key: UnitSortKey) -> Ordering {
    match key {
        UnitSortKey::Name => cmp_names(&a.name, &b.name),
        UnitSortKey::Faction => cmp_names(&a.faction.name, &b.faction.name),
        UnitSortKey::Movement => a.movement.unwrap_or(0).cmp(&b.movement.unwrap_or(0)),
        UnitSortKey::Toughness => a.toughness.cmp(&b.toughness),
        UnitSortKey::Save => a.save.cmp(&b.save),
        UnitSortKey::Wounds => a.wounds.cmp(&b.wounds),
        UnitSortKey::Leadership => a.leadership.cmp(&b.leadership),
        UnitSortKey::ObjectiveControl => a.objective_control.cmp(&b.objective_control),
        UnitSortKey::Points => a.min_points().unwrap_or(0).cmp(&b.min_points().unwrap_or(0)),
    }
}

fn compare_weapons(a: &Weapon, b: &Weapon, key: WeaponSortKey) -> Ordering {
    match key {
        WeaponSortKey::Name => cmp_names(&a.name, &b.name),
        WeaponSortKey::Range => a.range.unwrap_or(0).cmp(&b.range.unwrap_or(0)),
        WeaponSortKey::Attacks => leading_integer(&a.attacks).cmp(&leading_integer(&b.attacks)),
        WeaponSortKey::Skill => a.skill.unwrap_or(0).cmp(&b.skill.unwrap_or(0)),
        WeaponSortKey::Strength => leading_integer(&a.strength).cmp(&leading_integer(&b.strength)),
        WeaponSortKey::ArmorPenetration => a.armor_penetration.cmp(&b.armor_penetration),
        WeaponSortKey::Damage => leading_integer(&a.damage).cmp(&leading_integer(&b.damage)),
    }
}

/// Sorted copy of `units`.
pub fn sort_units(units: &[Unit], state: SortState<UnitSortKey>) -> Vec<Unit> {
    let mut sorted = units.to_vec();
    sorted.sort_by(|a, b| state.direction.apply(compare_units(a, b, state.criteria)));
    sorted
}

/// Sorted copy of `weapons`.
pub fn sort_weapons(weapons: &[Weapon], state: SortState<WeaponSortKey>) -> Vec<Weapon> {
    let mut sorted = weapons.to_vec();
    sorted.sort_by(|a, b| state.direction.apply(compare_weapons(a, b, state.criteria)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Faction, UnitType, WeaponType};

    fn unit(id: u32, name: &str, toughness: i32, movement: Option<i32>) -> Unit {
        Unit {
            id,
            name: name.into(),
            movement,
            toughness,
            save: 3,
            wounds: 2,
            leadership: 6,
            objective_control: 1,
            unit_type: UnitType::Other,
            faction: Faction {
                id: 1,
                name: "Orks".into(),
                category: Category {
                    id: 1,
                    name: "Xenos".into(),
                },
            },
            weapons: vec![],
            abilities: vec![],
            keywords: vec![],
            configurations: vec![],
            options: vec![],
            compositions: vec![],
        }
    }

    fn weapon(id: u32, attacks: &str) -> Weapon {
        Weapon {
            id,
            name: format!("w{id}"),
            weapon_type: WeaponType::Melee,
            range: None,
            attacks: attacks.into(),
            skill: None,
            strength: "4".into(),
            armor_penetration: 0,
            damage: "1".into(),
            abilities: vec![],
            units: vec![],
        }
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> u32) -> Vec<u32> {
        items.iter().map(id).collect()
    }

    #[test]
    fn defaults_to_name_ascending() {
        let state = SortState::<UnitSortKey>::default();
        assert_eq!(state.criteria, UnitSortKey::Name);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn names_compare_case_insensitively() {
        let units = vec![unit(1, "boyz", 5, None), unit(2, "Atomic", 5, None), unit(3, "Cadia", 3, None)];
        let sorted = sort_units(&units, SortState::default());
        assert_eq!(ids(&sorted, |u| u.id), vec![2, 1, 3]);
    }

    #[test]
    fn stable_in_both_directions() {
        let units = vec![
            unit(1, "a", 4, None),
            unit(2, "b", 5, None),
            unit(3, "c", 4, None),
            unit(4, "d", 5, None),
        ];
        let asc = sort_units(&units, SortState::new(UnitSortKey::Toughness, SortDirection::Ascending));
        assert_eq!(ids(&asc, |u| u.id), vec![1, 3, 2, 4]);
        let desc = sort_units(&units, SortState::new(UnitSortKey::Toughness, SortDirection::Descending));
        assert_eq!(ids(&desc, |u| u.id), vec![2, 4, 1, 3]);
    }

    #[test]
    fn input_is_untouched() {
        let units = vec![unit(2, "b", 4, None), unit(1, "a", 4, None)];
        let _ = sort_units(&units, SortState::default());
        assert_eq!(ids(&units, |u| u.id), vec![2, 1]);
    }

    #[test]
    fn unset_movement_sorts_as_zero() {
        let units = vec![unit(1, "a", 4, Some(6)), unit(2, "b", 4, None), unit(3, "c", 4, Some(0))];
        let sorted = sort_units(&units, SortState::new(UnitSortKey::Movement, SortDirection::Ascending));
        assert_eq!(ids(&sorted, |u| u.id), vec![2, 3, 1]);
    }

    #[test]
    fn dice_attacks_coerce_to_leading_integer() {
        let weapons = vec![weapon(1, "D6"), weapon(2, "2"), weapon(3, "D3+1")];
        let sorted = sort_weapons(
            &weapons,
            SortState::new(WeaponSortKey::Attacks, SortDirection::Ascending),
        );
        assert_eq!(ids(&sorted, |w| w.id), vec![1, 3, 2]);
    }

    #[test]
    fn leading_integer_cases() {
        assert_eq!(leading_integer("2"), 2);
        assert_eq!(leading_integer("2D6"), 2);
        assert_eq!(leading_integer("D6"), 0);
        assert_eq!(leading_integer("D3+1"), 0);
        assert_eq!(leading_integer(" 12 "), 12);
        assert_eq!(leading_integer("-1"), -1);
        assert_eq!(leading_integer(""), 0);
    }

    #[test]
    fn criteria_change_keeps_direction() {
        let state = SortState::new(WeaponSortKey::Name, SortDirection::Descending)
            .with_criteria(WeaponSortKey::Damage);
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(state.toggled().direction, SortDirection::Ascending);
    }

    #[test]
    fn cycling_wraps() {
        let state = SortState::new(WeaponSortKey::Damage, SortDirection::Descending).cycled();
        assert_eq!(state.criteria, WeaponSortKey::Name);
        assert_eq!(state.direction, SortDirection::Descending);
    }

    #[test]
    fn keys_parse_from_kebab_case() {
        assert_eq!("objective-control".parse::<UnitSortKey>().ok(), Some(UnitSortKey::ObjectiveControl));
        assert_eq!("AP".parse::<WeaponSortKey>().ok(), None);
        assert_eq!("armor-penetration".parse::<WeaponSortKey>().ok(), Some(WeaponSortKey::ArmorPenetration));
    }
}
