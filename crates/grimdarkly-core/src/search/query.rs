// ── Query-string parsing ──
//
// Link → typed params. Recognized keys only; malformed values are dropped
// rather than defaulted, and keywords go through the same validation as
// typed input.

use tracing::debug;
use url::form_urlencoded;

use crate::model::RecordKind;
use crate::search::field::FilterField;
use crate::search::keywords::KeywordAccumulator;
use crate::search::params::{KEYWORD_KEY, SearchParams};

impl SearchParams {
    /// Parse a query string (leading `?` optional) into params for `kind`.
    ///
    /// Repeated keys: the last well-formed value wins. Keyword values are
    /// split on commas and validated in order.
    pub fn from_query(kind: RecordKind, query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = Self::empty(kind);
        let mut keywords = KeywordAccumulator::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if key == KEYWORD_KEY {
                for candidate in value.split(',') {
                    if let Err(e) = keywords.try_add(candidate) {
                        debug!(%key, candidate, error = %e, "dropping keyword from query");
                    }
                }
                continue;
            }

            match FilterField::from_key(&key) {
                Some(field) if params.apply(field, &value) => {}
                Some(_) => debug!(%key, %value, "dropping malformed query value"),
                None => debug!(%key, "ignoring unrecognized query key"),
            }
        }

        *params.keywords_mut() = keywords.keywords().to_vec();
        params
    }
}
