//! Search flow shared by `units search` and `weapons search`.
//!
//! Flags are fed through the same form, keyword and page state the TUI uses,
//! so the CLI accepts and rejects exactly what an interactive user could.

use tracing::debug;

use grimdarkly_core::{
    Catalog, CoreError, FilterField, RecordKind, SearchPage, SearchParams, SearchPhase,
};

use crate::cli::SearchOpts;
use crate::error::CliError;
use crate::output;

use super::util;

/// Build a page from an optional link plus explicit flags (flags win).
pub fn build_page(
    kind: RecordKind,
    fields: &[(FilterField, Option<&str>)],
    opts: &SearchOpts,
    quiet: bool,
) -> Result<SearchPage, CliError> {
    let mut page = SearchPage::new(kind);

    if let Some(query) = opts.query.as_deref() {
        let params = SearchParams::from_query(kind, query);
        debug!(query, parsed = ?params, "seeding from query string");
        page.form_mut().seed(&params);
    }

    for &(field, raw) in fields {
        let Some(raw) = raw else { continue };
        let form = page.form_mut();
        if field.is_numeric() {
            let accepted = form
                .numeric_field_change(field, raw.trim())
                .map_err(|e| invalid(field, &e.to_string()))?;
            if !accepted {
                return Err(invalid(field, "expected a whole number"));
            }
        } else {
            form.set_field(field, Some(raw))
                .map_err(|e| invalid(field, &e.to_string()))?;
        }
        if page.form().params().value(field).is_none() {
            return Err(invalid(field, &format!("'{raw}' is not accepted")));
        }
    }

    let keywords = page.form_mut().keywords_mut();
    for raw in &opts.keyword {
        let mut problems = keywords.on_text_change(raw);
        if let Err(e) = keywords.on_commit() {
            problems.push(e);
        }
        for problem in problems {
            output::print_status(&format!("Skipping keyword: {problem}"), quiet);
        }
    }

    Ok(page)
}

fn invalid(field: FilterField, reason: &str) -> CliError {
    CliError::Validation {
        field: field.label().to_owned(),
        reason: reason.to_owned(),
    }
}

/// Run the page's search. `Ok(false)` when there was nothing to search for.
pub async fn execute(page: &mut SearchPage, catalog: &Catalog, quiet: bool) -> Result<bool, CliError> {
    if !page.form().has_active_filters() {
        output::print_status(
            &format!(
                "No filters set. Give at least one filter or --query to search {}s.",
                page.kind().noun()
            ),
            quiet,
        );
        return Ok(false);
    }

    let spinner = util::spinner(format!("Searching {}s...", page.kind().noun()), quiet);
    let result = page.search(catalog).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(searched) => Ok(searched),
        Err(e @ (CoreError::ConnectionFailed { .. } | CoreError::Timeout { .. })) => Err(e.into()),
        Err(e) => {
            debug!(error = %e, "search failed");
            Err(CliError::SearchFailed {
                message: page.status_line(),
            })
        }
    }
}

/// Status line, then the share link when asked for.
pub fn finish(page: &SearchPage, opts: &SearchOpts, quiet: bool) {
    if matches!(page.phase(), SearchPhase::Loaded(_)) {
        output::print_status(&page.status_line(), quiet);
    }
    if opts.share {
        output::print_status(
            &format!("Share: {}", page.form().params().to_query_string()),
            quiet,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn opts() -> SearchOpts {
        SearchOpts {
            query: None,
            keyword: vec![],
            sort: None,
            desc: false,
            expand: false,
            share: false,
        }
    }

    #[test]
    fn flags_override_link_values() {
        let mut o = opts();
        o.query = Some("?faction=Orks&minToughness=5".into());
        let page = build_page(
            RecordKind::Unit,
            &[(FilterField::MinToughness, Some("7"))],
            &o,
            true,
        )
        .unwrap();
        assert_eq!(
            page.form().params().to_query_string(),
            "?faction=Orks&minToughness=7"
        );
    }

    #[test]
    fn bad_keywords_are_skipped() {
        let mut o = opts();
        o.keyword = vec!["berzerker, x, chaos".into(), "berzerker".into()];
        let page = build_page(RecordKind::Unit, &[], &o, true).unwrap();
        assert_eq!(page.form().keywords().keywords(), ["berzerker", "chaos"]);
    }

    #[test]
    fn non_numeric_flag_is_rejected() {
        let err = build_page(
            RecordKind::Weapon,
            &[(FilterField::MinRange, Some("far"))],
            &opts(),
            true,
        )
        .err()
        .unwrap();
        assert!(matches!(err, CliError::Validation { field, .. } if field == "Min Range"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(
            build_page(
                RecordKind::Unit,
                &[(FilterField::UnitType, Some("tank"))],
                &opts(),
                true,
            )
            .is_err()
        );
    }

    #[test]
    fn negative_ap_is_accepted() {
        let page = build_page(
            RecordKind::Weapon,
            &[(FilterField::ArmorPenetration, Some("-2"))],
            &opts(),
            true,
        )
        .unwrap();
        assert_eq!(page.form().params().to_query_string(), "?ap=-2");
    }
}
