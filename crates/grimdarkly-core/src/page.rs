// ── Page controllers ──
//
// A search page owns its filter form, sort state, expansion state and the
// phase of the current fetch. Links seed it once on mount; edits to the form
// afterwards never rewrite the link.

use tracing::debug;

use crate::catalog::{Catalog, SearchResults};
use crate::error::CoreError;
use crate::model::RecordKind;
use crate::presentation::ExpansionState;
use crate::search::form::FilterForm;
use crate::search::params::SearchParams;
use crate::sort::{SortState, UnitSortKey, WeaponSortKey, sort_units, sort_weapons};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing searched yet (or cleared).
    Idle,
    Loading,
    Loaded(SearchResults),
    /// The search succeeded with zero matches.
    NoResults,
    Failed(String),
}

/// Sort state matching the page's record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSort {
    Unit(SortState<UnitSortKey>),
    Weapon(SortState<WeaponSortKey>),
}

impl PageSort {
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Unit => Self::Unit(SortState::default()),
            RecordKind::Weapon => Self::Weapon(SortState::default()),
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Self::Unit(s) => Self::Unit(s.cycled()),
            Self::Weapon(s) => Self::Weapon(s.cycled()),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Unit(s) => Self::Unit(s.toggled()),
            Self::Weapon(s) => Self::Weapon(s.toggled()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Unit(s) => s.label(),
            Self::Weapon(s) => s.label(),
        }
    }

    /// Sorted copy of `results`. Mismatched kinds come back unsorted.
    pub fn apply(&self, results: &SearchResults) -> SearchResults {
        match (self, results) {
            (Self::Unit(s), SearchResults::Units(u)) => SearchResults::Units(sort_units(u, *s)),
            (Self::Weapon(s), SearchResults::Weapons(w)) => {
                SearchResults::Weapons(sort_weapons(w, *s))
            }
            (_, other) => other.clone(),
        }
    }
}

pub struct SearchPage {
    form: FilterForm,
    sort: PageSort,
    phase: SearchPhase,
    expansion: ExpansionState,
}

impl SearchPage {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            form: FilterForm::new(kind),
            sort: PageSort::for_kind(kind),
            phase: SearchPhase::Idle,
            expansion: ExpansionState::default(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.form.kind()
    }

    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FilterForm {
        &mut self.form
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn sort(&self) -> PageSort {
        self.sort
    }

    pub fn set_sort(&mut self, sort: PageSort) {
        self.sort = sort;
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn expansion_mut(&mut self) -> &mut ExpansionState {
        &mut self.expansion
    }

    /// Enter the page with a query string. Seeds the form from the parsed
    /// params and, when anything was parsed, submits exactly as a manual
    /// search would. Returns the params to fetch.
    pub fn mount(&mut self, query: &str) -> Option<SearchParams> {
        let params = SearchParams::from_query(self.kind(), query);
        if params.is_empty() {
            return None;
        }
        debug!(kind = self.kind().noun(), query, "mounting with link params");
        self.form.seed(&params);
        self.submit()
    }

    /// Guarded submission. On success the page is `Loading` and the caller
    /// must fetch the returned params and hand the outcome to `complete`.
    pub fn submit(&mut self) -> Option<SearchParams> {
        let params = self.form.submit()?;
        self.phase = SearchPhase::Loading;
        Some(params)
    }

    /// Record the outcome of the fetch started by `submit`.
    pub fn complete(&mut self, result: Result<SearchResults, CoreError>) {
        self.form.finish_submission();
        self.expansion.reset();
        self.phase = match result {
            Ok(results) if results.is_empty() => SearchPhase::NoResults,
            Ok(results) => SearchPhase::Loaded(results),
            Err(e) => {
                debug!(error = %e, "search failed");
                SearchPhase::Failed(format!(
                    "Failed to search {}s. Please try again.",
                    self.kind().noun()
                ))
            }
        };
    }

    /// Reset the form and drop any rendered results.
    pub fn clear(&mut self) {
        let _ = self.form.clear();
        self.expansion.reset();
        if !self.form.is_in_flight() {
            self.phase = SearchPhase::Idle;
        }
    }

    /// Fetched results in the current sort order; the fetched list itself
    /// is left as it arrived.
    pub fn sorted_results(&self) -> Option<SearchResults> {
        match &self.phase {
            SearchPhase::Loaded(results) => Some(self.sort.apply(results)),
            _ => None,
        }
    }

    /// One-line summary of the current phase.
    pub fn status_line(&self) -> String {
        let noun = self.kind().noun();
        match &self.phase {
            SearchPhase::Idle => format!("Use the filters to search for {noun}s."),
            SearchPhase::Loading => format!("Searching {noun}s..."),
            SearchPhase::Loaded(r) if r.len() == 1 => format!("Found 1 {noun}"),
            SearchPhase::Loaded(r) => format!("Found {} {noun}s", r.len()),
            SearchPhase::NoResults => format!("No {noun}s found"),
            SearchPhase::Failed(msg) => msg.clone(),
        }
    }

    /// Submit and fetch in one step.
    ///
    /// `Ok(false)` when nothing was submitted (no filters, or already in
    /// flight). On failure the page is left in `Failed` and the error is
    /// returned as well.
    pub async fn search(&mut self, catalog: &Catalog) -> Result<bool, CoreError> {
        let Some(params) = self.submit() else {
            return Ok(false);
        };
        let result = catalog.search(&params).await;
        let err = result.as_ref().err().cloned();
        self.complete(result);
        match err {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }
}

/// Single-record view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState<T> {
    Loading,
    Loaded(T),
    NotFound,
    Failed(String),
}

impl<T> DetailState<T> {
    pub fn from_result(result: Result<T, CoreError>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(e) if e.is_not_found() => Self::NotFound,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{WeaponType, Weapon};
    use crate::search::field::FilterField;

    fn weapon(id: u32, name: &str) -> Weapon {
        Weapon {
            id,
            name: name.into(),
            weapon_type: WeaponType::Ranged,
            range: Some(24),
            attacks: "1".into(),
            skill: Some(3),
            strength: "4".into(),
            armor_penetration: 0,
            damage: "1".into(),
            abilities: vec![],
            units: vec![],
        }
    }

    #[test]
    fn mount_without_params_does_nothing() {
        let mut page = SearchPage::new(RecordKind::Unit);
        assert_eq!(page.mount(""), None);
        assert_eq!(page.mount("?color=red&minToughness=abc"), None);
        assert_eq!(page.phase(), &SearchPhase::Idle);
    }

    #[test]
    fn mount_with_params_seeds_and_submits() {
        let mut page = SearchPage::new(RecordKind::Unit);
        let params = page.mount("?faction=Orks&minToughness=5");
        assert!(params.is_some());
        assert_eq!(page.phase(), &SearchPhase::Loading);
        assert_eq!(page.form().raw_value(FilterField::Faction), "Orks");
        assert_eq!(page.form().raw_value(FilterField::MinToughness), "5");
        // A second submit while loading is suppressed.
        assert_eq!(page.submit(), None);
    }

    #[test]
    fn complete_moves_to_terminal_phase() {
        let mut page = SearchPage::new(RecordKind::Weapon);
        page.form_mut().set_field(FilterField::Name, Some("bolt")).ok();

        assert!(page.submit().is_some());
        page.complete(Ok(SearchResults::Weapons(vec![])));
        assert_eq!(page.phase(), &SearchPhase::NoResults);
        assert_eq!(page.status_line(), "No weapons found");

        assert!(page.submit().is_some());
        page.complete(Err(CoreError::Timeout { timeout_secs: 10 }));
        assert_eq!(
            page.phase(),
            &SearchPhase::Failed("Failed to search weapons. Please try again.".into())
        );

        assert!(page.submit().is_some());
        page.complete(Ok(SearchResults::Weapons(vec![weapon(1, "Bolter")])));
        assert_eq!(page.status_line(), "Found 1 weapon");
    }

    #[test]
    fn sorting_leaves_fetched_order_alone() {
        let mut page = SearchPage::new(RecordKind::Weapon);
        page.form_mut().set_field(FilterField::Name, Some("a")).ok();
        let _ = page.submit();
        page.complete(Ok(SearchResults::Weapons(vec![weapon(1, "Zzap gun"), weapon(2, "Autogun")])));

        let Some(SearchResults::Weapons(sorted)) = page.sorted_results() else {
            panic!("expected weapons");
        };
        assert_eq!(sorted[0].id, 2);

        page.set_sort(page.sort().toggled());
        let Some(SearchResults::Weapons(sorted)) = page.sorted_results() else {
            panic!("expected weapons");
        };
        assert_eq!(sorted[0].id, 1);

        let SearchPhase::Loaded(SearchResults::Weapons(raw)) = page.phase() else {
            panic!("expected loaded");
        };
        assert_eq!(raw[0].id, 1);
    }

    #[test]
    fn clear_returns_to_idle() {
        let mut page = SearchPage::new(RecordKind::Unit);
        page.form_mut().set_field(FilterField::Name, Some("boyz")).ok();
        let _ = page.submit();
        page.complete(Ok(SearchResults::Units(vec![])));
        page.clear();
        page.clear();
        assert_eq!(page.phase(), &SearchPhase::Idle);
        assert!(!page.form().has_active_filters());
    }

    #[test]
    fn detail_state_distinguishes_not_found() {
        let missing: DetailState<u32> = DetailState::from_result(Err(CoreError::NotFound {
            entity_type: "Unit".into(),
            identifier: "9".into(),
        }));
        assert_eq!(missing, DetailState::NotFound);

        let failed: DetailState<u32> =
            DetailState::from_result(Err(CoreError::Internal("bad".into())));
        assert!(matches!(failed, DetailState::Failed(_)));
        assert_eq!(DetailState::from_result(Ok(3)).loaded(), Some(&3));
    }
}
