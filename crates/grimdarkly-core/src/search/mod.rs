// ── Search state ──
//
// Filter fields, typed params, the keyword accumulator, the form that ties
// them together, and query-string parsing.

pub mod field;
pub mod form;
pub mod keywords;
pub mod params;
pub mod query;

pub use field::FilterField;
pub use form::{ClearResults, FilterForm, FormError};
pub use keywords::{KeywordAccumulator, KeywordError};
pub use params::{SearchParams, UnitSearchParams, WeaponSearchParams};
