// ── Filter form state ──
//
// Raw field text for one record kind plus the keyword accumulator. Typed
// `SearchParams` are derived from the raw text on demand, so anything that
// fails to parse never reaches a request.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::model::RecordKind;
use crate::search::field::{FilterField, is_integer_text};
use crate::search::keywords::KeywordAccumulator;
use crate::search::params::SearchParams;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{} does not apply to {} searches", .field.label(), .kind.noun())]
    FieldNotApplicable { field: FilterField, kind: RecordKind },

    #[error("{} is not a numeric field", .0.label())]
    NotNumeric(FilterField),
}

/// Returned by [`FilterForm::clear`]; the holder of rendered results must
/// drop them too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ClearResults;

#[derive(Debug, Clone)]
pub struct FilterForm {
    kind: RecordKind,
    values: BTreeMap<FilterField, String>,
    keywords: KeywordAccumulator,
    in_flight: bool,
}

impl FilterForm {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
            keywords: KeywordAccumulator::new(),
            in_flight: false,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn fields(&self) -> Vec<FilterField> {
        FilterField::for_kind(self.kind)
    }

    fn check_applicable(&self, field: FilterField) -> Result<(), FormError> {
        if field.applies_to(self.kind) {
            Ok(())
        } else {
            Err(FormError::FieldNotApplicable {
                field,
                kind: self.kind,
            })
        }
    }

    /// Store raw text for a field. `None` or blank text unsets it.
    pub fn set_field(&mut self, field: FilterField, raw: Option<&str>) -> Result<(), FormError> {
        self.check_applicable(field)?;
        match raw {
            Some(text) if !text.trim().is_empty() => {
                self.values.insert(field, text.to_owned());
            }
            _ => {
                self.values.remove(&field);
            }
        }
        Ok(())
    }

    /// Keystroke filter for numeric inputs.
    ///
    /// Returns `Ok(false)` and leaves the form untouched when `raw` is not
    /// integer-shaped for this field.
    pub fn numeric_field_change(&mut self, field: FilterField, raw: &str) -> Result<bool, FormError> {
        self.check_applicable(field)?;
        if !field.is_numeric() {
            return Err(FormError::NotNumeric(field));
        }
        if !is_integer_text(raw, field.allows_negative()) {
            debug!(field = field.key(), raw, "rejected numeric keystroke");
            return Ok(false);
        }
        self.set_field(field, Some(raw))?;
        Ok(true)
    }

    /// Raw text currently shown for a field.
    pub fn raw_value(&self, field: FilterField) -> &str {
        self.values.get(&field).map_or("", String::as_str)
    }

    pub fn keywords(&self) -> &KeywordAccumulator {
        &self.keywords
    }

    pub fn keywords_mut(&mut self) -> &mut KeywordAccumulator {
        &mut self.keywords
    }

    /// Typed params derived from the raw values; unparsable text is omitted.
    pub fn params(&self) -> SearchParams {
        let mut params = SearchParams::empty(self.kind);
        for (field, raw) in &self.values {
            params.apply(*field, raw);
        }
        *params.keywords_mut() = self.keywords.keywords().to_vec();
        params
    }

    pub fn has_active_filters(&self) -> bool {
        !self.params().is_empty()
    }

    /// `(label, value)` pairs for an "active filters" summary.
    pub fn active_filters(&self) -> Vec<(&'static str, String)> {
        let params = self.params();
        let mut active: Vec<(&'static str, String)> = self
            .fields()
            .into_iter()
            .filter_map(|f| params.value(f).map(|v| (f.label(), v)))
            .collect();
        if !self.keywords.is_empty() {
            active.push(("Keywords", self.keywords.keywords().join(", ")));
        }
        active
    }

    /// Populate displayed values from already-parsed params.
    pub fn seed(&mut self, params: &SearchParams) {
        self.values.clear();
        for field in self.fields() {
            if let Some(v) = params.value(field) {
                self.values.insert(field, v);
            }
        }
        self.keywords = KeywordAccumulator::from_keywords(params.keywords());
    }

    /// Reset every field and keyword. Calling it twice is the same as once.
    pub fn clear(&mut self) -> ClearResults {
        self.values.clear();
        self.keywords.clear();
        ClearResults
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Guarded submission: `None` when nothing is set or a previous
    /// submission has not finished.
    pub fn submit(&mut self) -> Option<SearchParams> {
        if self.in_flight {
            debug!(kind = self.kind.noun(), "search already in flight; ignoring submit");
            return None;
        }
        let params = self.params();
        if params.is_empty() {
            return None;
        }
        self.in_flight = true;
        Some(params)
    }

    /// End the in-flight window opened by [`submit`](Self::submit).
    pub fn finish_submission(&mut self) {
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_does_not_submit() {
        let mut form = FilterForm::new(RecordKind::Unit);
        assert!(!form.has_active_filters());
        assert_eq!(form.submit(), None);
        assert!(!form.is_in_flight());
    }

    #[test]
    fn reentrant_submit_is_suppressed() {
        let mut form = FilterForm::new(RecordKind::Unit);
        form.set_field(FilterField::Name, Some("Berzerker")).ok();
        assert!(form.submit().is_some());
        assert_eq!(form.submit(), None);
        form.finish_submission();
        assert!(form.submit().is_some());
    }

    #[test]
    fn numeric_keystrokes_are_filtered() {
        let mut form = FilterForm::new(RecordKind::Unit);
        assert_eq!(form.numeric_field_change(FilterField::MinToughness, "5"), Ok(true));
        assert_eq!(form.numeric_field_change(FilterField::MinToughness, "5a"), Ok(false));
        assert_eq!(form.numeric_field_change(FilterField::MinToughness, "-5"), Ok(false));
        assert_eq!(form.raw_value(FilterField::MinToughness), "5");
        assert_eq!(
            form.numeric_field_change(FilterField::Name, "5"),
            Err(FormError::NotNumeric(FilterField::Name))
        );
    }

    #[test]
    fn ap_accepts_minus() {
        let mut form = FilterForm::new(RecordKind::Weapon);
        assert_eq!(form.numeric_field_change(FilterField::ArmorPenetration, "-"), Ok(true));
        // A lone minus is typed but is not a constraint yet.
        assert!(!form.has_active_filters());
        assert_eq!(form.numeric_field_change(FilterField::ArmorPenetration, "-2"), Ok(true));
        assert_eq!(form.params().to_query_pairs(), vec![("ap", "-2".to_owned())]);
    }

    #[test]
    fn zero_counts_as_set() {
        let mut form = FilterForm::new(RecordKind::Weapon);
        form.numeric_field_change(FilterField::ArmorPenetration, "0").ok();
        assert!(form.has_active_filters());
    }

    #[test]
    fn values_are_not_clamped() {
        let mut form = FilterForm::new(RecordKind::Unit);
        form.numeric_field_change(FilterField::MinToughness, "99").ok();
        assert_eq!(form.params().value(FilterField::MinToughness).as_deref(), Some("99"));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut form = FilterForm::new(RecordKind::Unit);
        assert!(matches!(
            form.set_field(FilterField::Attacks, Some("D6")),
            Err(FormError::FieldNotApplicable { .. })
        ));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut form = FilterForm::new(RecordKind::Unit);
        form.set_field(FilterField::Faction, Some("Orks")).ok();
        form.keywords_mut().on_text_change("infantry,");
        let _ = form.clear();
        let once = form.params();
        let _ = form.clear();
        assert_eq!(form.params(), once);
        assert!(once.is_empty());
        assert!(form.keywords().is_empty());
    }

    #[test]
    fn keywords_alone_allow_submit() {
        let mut form = FilterForm::new(RecordKind::Weapon);
        form.keywords_mut().on_text_change("pistol,");
        assert!(form.has_active_filters());
        let params = form.submit();
        assert_eq!(
            params.map(|p| p.to_query_pairs()),
            Some(vec![("keyword", "pistol".to_owned())])
        );
    }

    #[test]
    fn seed_then_active_filters() {
        let mut form = FilterForm::new(RecordKind::Unit);
        let params = SearchParams::from_query(RecordKind::Unit, "faction=Orks&minWounds=3&keyword=mob");
        form.seed(&params);
        assert_eq!(form.raw_value(FilterField::Faction), "Orks");
        assert_eq!(
            form.active_filters(),
            vec![
                ("Faction", "Orks".to_owned()),
                ("Min Wounds", "3".to_owned()),
                ("Keywords", "mob".to_owned()),
            ]
        );
        assert_eq!(form.params(), params);
    }
}
