//! Search and presentation state between `grimdarkly-api` and the front-ends
//! (CLI / TUI).
//!
//! - **[`Catalog`]**: Cloneable facade over the HTTP client. Converts wire
//!   payloads into domain models and transport failures into [`CoreError`].
//!
//! - **Search state** ([`search`]): [`FilterForm`] holds raw field text for
//!   one record kind and derives typed [`SearchParams`]; the
//!   [`KeywordAccumulator`] turns typed or pasted text into an ordered tag
//!   list; query strings parse into params and params render back into
//!   shareable links.
//!
//! - **[`SearchPage`]**: Per-kind page controller: guarded submission,
//!   loading / loaded / empty / failed phases, link-driven initial search.
//!
//! - **Sort engine** ([`sort`]): Stable, non-mutating ordering of fetched
//!   lists by a per-kind criterion and direction.
//!
//! - **Presentation** ([`presentation`]): Expand/collapse state for capped
//!   tag lists and "read more" text truncation.
//!
//! - **Preferences** ([`settings`]): The persisted "show variant content"
//!   toggle behind a [`PreferenceStore`] seam.

pub mod catalog;
pub mod config;
pub mod convert;
pub mod directory;
pub mod error;
pub mod model;
pub mod page;
pub mod presentation;
pub mod search;
pub mod settings;
pub mod sort;

// ── Primary re-exports ──────────────────────────────────────────────
pub use catalog::{Catalog, SearchResults};
pub use config::CatalogConfig;
pub use directory::{FactionEntry, faction_description, faction_directory};
pub use error::CoreError;
pub use page::{DetailState, PageSort, SearchPage, SearchPhase};
pub use presentation::{Disclosure, ExpansionState, SubList, ToggleControl, ToggleInput};
pub use search::{
    FilterField, FilterForm, KeywordAccumulator, KeywordError, SearchParams, UnitSearchParams,
    WeaponSearchParams,
};
pub use settings::{MemoryStore, PreferenceStore, Preferences};
pub use sort::{SortDirection, SortState, UnitSortKey, WeaponSortKey};

pub use model::{
    Ability, Category, Composition, Configuration, Faction, Keyword, RecordKind, Unit, UnitOption,
    UnitRef, UnitType, Weapon, WeaponAbility, WeaponRef, WeaponType,
};
