// ── Search parameters ──
//
// Sparse, typed filter records. `None` / empty means "no constraint".
// Keywords are held once, as an ordered list; the comma-joined wire
// string is produced on demand.

use serde::Serialize;
use url::form_urlencoded;

use crate::model::{RecordKind, UnitType, WeaponType};
use crate::search::field::{FieldShape, FilterField};

/// Query key for the comma-joined keyword list.
pub const KEYWORD_KEY: &str = "keyword";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitSearchParams {
    pub name: Option<String>,
    pub faction: Option<String>,
    pub unit_type: Option<UnitType>,
    pub keywords: Vec<String>,
    pub min_toughness: Option<i32>,
    pub max_toughness: Option<i32>,
    pub min_wounds: Option<i32>,
    pub max_wounds: Option<i32>,
    pub min_movement: Option<i32>,
    pub max_movement: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeaponSearchParams {
    pub name: Option<String>,
    pub weapon_type: Option<WeaponType>,
    pub keywords: Vec<String>,
    pub min_range: Option<i32>,
    pub max_range: Option<i32>,
    pub ap: Option<i32>,
    pub attacks: Option<String>,
}

/// Search request for either record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchParams {
    Unit(UnitSearchParams),
    Weapon(WeaponSearchParams),
}

/// A parsed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(String),
    Int(i32),
    UnitType(UnitType),
    WeaponType(WeaponType),
}

impl FieldValue {
    /// Interpret raw text for `field`. `None` for empty or malformed text.
    fn parse(field: FilterField, raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        match field.shape() {
            FieldShape::Text => Some(Self::Text(text.to_owned())),
            FieldShape::Integer { signed } => {
                let n: i32 = text.parse().ok()?;
                (signed || n >= 0).then_some(Self::Int(n))
            }
            FieldShape::Choice => match field {
                FilterField::UnitType => text.parse().ok().map(Self::UnitType),
                FilterField::WeaponType => text.parse().ok().map(Self::WeaponType),
                _ => None,
            },
        }
    }
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, field: FilterField, value: Option<&String>) {
    if let Some(v) = value {
        pairs.push((field.key(), v.clone()));
    }
}

fn push_int(pairs: &mut Vec<(&'static str, String)>, field: FilterField, value: Option<i32>) {
    if let Some(v) = value {
        pairs.push((field.key(), v.to_string()));
    }
}

fn push_keywords(pairs: &mut Vec<(&'static str, String)>, keywords: &[String]) {
    if !keywords.is_empty() {
        pairs.push((KEYWORD_KEY, keywords.join(",")));
    }
}

impl UnitSearchParams {
    /// Wire / query pairs in a fixed key order, constraints only.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, FilterField::Name, self.name.as_ref());
        push_text(&mut pairs, FilterField::Faction, self.faction.as_ref());
        if let Some(t) = self.unit_type {
            pairs.push((FilterField::UnitType.key(), t.to_string()));
        }
        push_keywords(&mut pairs, &self.keywords);
        push_int(&mut pairs, FilterField::MinToughness, self.min_toughness);
        push_int(&mut pairs, FilterField::MaxToughness, self.max_toughness);
        push_int(&mut pairs, FilterField::MinWounds, self.min_wounds);
        push_int(&mut pairs, FilterField::MaxWounds, self.max_wounds);
        push_int(&mut pairs, FilterField::MinMovement, self.min_movement);
        push_int(&mut pairs, FilterField::MaxMovement, self.max_movement);
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }

    pub fn keyword_query(&self) -> Option<String> {
        (!self.keywords.is_empty()).then(|| self.keywords.join(","))
    }

    pub fn to_query_string(&self) -> String {
        encode_query(&self.to_query_pairs())
    }

    fn set(&mut self, field: FilterField, value: FieldValue) -> bool {
        match (field, value) {
            (FilterField::Name, FieldValue::Text(s)) => self.name = Some(s),
            (FilterField::Faction, FieldValue::Text(s)) => self.faction = Some(s),
            (FilterField::UnitType, FieldValue::UnitType(t)) => self.unit_type = Some(t),
            (FilterField::MinToughness, FieldValue::Int(n)) => self.min_toughness = Some(n),
            (FilterField::MaxToughness, FieldValue::Int(n)) => self.max_toughness = Some(n),
            (FilterField::MinWounds, FieldValue::Int(n)) => self.min_wounds = Some(n),
            (FilterField::MaxWounds, FieldValue::Int(n)) => self.max_wounds = Some(n),
            (FilterField::MinMovement, FieldValue::Int(n)) => self.min_movement = Some(n),
            (FilterField::MaxMovement, FieldValue::Int(n)) => self.max_movement = Some(n),
            _ => return false,
        }
        true
    }
}

impl WeaponSearchParams {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_text(&mut pairs, FilterField::Name, self.name.as_ref());
        if let Some(t) = self.weapon_type {
            pairs.push((FilterField::WeaponType.key(), t.to_string()));
        }
        push_keywords(&mut pairs, &self.keywords);
        push_int(&mut pairs, FilterField::MinRange, self.min_range);
        push_int(&mut pairs, FilterField::MaxRange, self.max_range);
        push_int(&mut pairs, FilterField::ArmorPenetration, self.ap);
        push_text(&mut pairs, FilterField::Attacks, self.attacks.as_ref());
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }

    pub fn keyword_query(&self) -> Option<String> {
        (!self.keywords.is_empty()).then(|| self.keywords.join(","))
    }

    pub fn to_query_string(&self) -> String {
        encode_query(&self.to_query_pairs())
    }

    fn set(&mut self, field: FilterField, value: FieldValue) -> bool {
        match (field, value) {
            (FilterField::Name, FieldValue::Text(s)) => self.name = Some(s),
            (FilterField::WeaponType, FieldValue::WeaponType(t)) => self.weapon_type = Some(t),
            (FilterField::MinRange, FieldValue::Int(n)) => self.min_range = Some(n),
            (FilterField::MaxRange, FieldValue::Int(n)) => self.max_range = Some(n),
            (FilterField::ArmorPenetration, FieldValue::Int(n)) => self.ap = Some(n),
            (FilterField::Attacks, FieldValue::Text(s)) => self.attacks = Some(s),
            _ => return false,
        }
        true
    }
}

impl SearchParams {
    /// Empty params for a record kind.
    pub fn empty(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Unit => Self::Unit(UnitSearchParams::default()),
            RecordKind::Weapon => Self::Weapon(WeaponSearchParams::default()),
        }
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Unit(_) => RecordKind::Unit,
            Self::Weapon(_) => RecordKind::Weapon,
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Unit(p) => p.to_query_pairs(),
            Self::Weapon(p) => p.to_query_pairs(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Unit(p) => p.is_empty(),
            Self::Weapon(p) => p.is_empty(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        match self {
            Self::Unit(p) => &p.keywords,
            Self::Weapon(p) => &p.keywords,
        }
    }

    pub(crate) fn keywords_mut(&mut self) -> &mut Vec<String> {
        match self {
            Self::Unit(p) => &mut p.keywords,
            Self::Weapon(p) => &mut p.keywords,
        }
    }

    /// Shareable query string (`?faction=Orks&minToughness=5`), or an empty
    /// string when nothing is set.
    pub fn to_query_string(&self) -> String {
        encode_query(&self.to_query_pairs())
    }

    /// Interpret raw text for a field and store it.
    ///
    /// Returns `false`, leaving the params untouched, when the field does
    /// not belong to this kind or the text is empty or malformed.
    pub fn apply(&mut self, field: FilterField, raw: &str) -> bool {
        if !field.applies_to(self.kind()) {
            return false;
        }
        let Some(value) = FieldValue::parse(field, raw) else {
            return false;
        };
        match self {
            Self::Unit(p) => p.set(field, value),
            Self::Weapon(p) => p.set(field, value),
        }
    }

    /// Display text of a field's current constraint, if any.
    pub fn value(&self, field: FilterField) -> Option<String> {
        self.to_query_pairs()
            .into_iter()
            .find(|(key, _)| *key == field.key())
            .map(|(_, v)| v)
    }
}

impl From<UnitSearchParams> for SearchParams {
    fn from(p: UnitSearchParams) -> Self {
        Self::Unit(p)
    }
}

impl From<WeaponSearchParams> for SearchParams {
    fn from(p: WeaponSearchParams) -> Self {
        Self::Weapon(p)
    }
}

fn encode_query(pairs: &[(&'static str, String)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut ser = form_urlencoded::Serializer::for_suffix(String::from("?"), 1);
    for (k, v) in pairs {
        ser.append_pair(k, v);
    }
    ser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_a_real_constraint() {
        let mut params = SearchParams::empty(RecordKind::Weapon);
        assert!(params.apply(FilterField::ArmorPenetration, "0"));
        assert!(!params.is_empty());
        assert_eq!(params.to_query_pairs(), vec![("ap", "0".to_owned())]);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let mut params = SearchParams::empty(RecordKind::Unit);
        assert!(!params.apply(FilterField::MinToughness, "abc"));
        assert!(!params.apply(FilterField::MinToughness, "-3"));
        assert!(!params.apply(FilterField::Name, "   "));
        assert!(!params.apply(FilterField::UnitType, "VEHICLE"));
        assert!(!params.apply(FilterField::ArmorPenetration, "-1"));
        assert!(params.is_empty());
    }

    #[test]
    fn choice_fields_parse_case_insensitively() {
        let mut params = SearchParams::empty(RecordKind::Unit);
        assert!(params.apply(FilterField::UnitType, "character"));
        assert_eq!(params.value(FilterField::UnitType).as_deref(), Some("CHARACTER"));
    }

    #[test]
    fn query_string_encodes_spaces_and_keywords() {
        let params = SearchParams::Unit(UnitSearchParams {
            faction: Some("World Eaters".into()),
            keywords: vec!["berzerker".into(), "infantry".into()],
            min_toughness: Some(5),
            ..UnitSearchParams::default()
        });
        assert_eq!(
            params.to_query_string(),
            "?faction=World+Eaters&keyword=berzerker%2Cinfantry&minToughness=5"
        );
        assert_eq!(SearchParams::empty(RecordKind::Unit).to_query_string(), "");
    }

    #[test]
    fn shared_link_starts_with_first_pair() {
        let params = SearchParams::Weapon(WeaponSearchParams {
            name: Some("Bolt rifle".into()),
            ..WeaponSearchParams::default()
        });
        let link = params.to_query_string();
        assert_eq!(link, "?name=Bolt+rifle");
        assert!(!link.contains("?&"));
        assert_eq!(SearchParams::from_query(RecordKind::Weapon, &link), params);
    }

    #[test]
    fn keyword_query_is_derived() {
        let mut params = WeaponSearchParams::default();
        assert_eq!(params.keyword_query(), None);
        params.keywords.push("pistol".into());
        params.keywords.push("assault".into());
        assert_eq!(params.keyword_query().as_deref(), Some("pistol,assault"));
    }
}
