//! Search filters: category/section multiselects and date-range verification.
//!
//! Filter values are compared in a normalized form: the checkbox value up to
//! its `|nyt:` suffix, with spaces removed and lowercased, so `"Opinion"`,
//! `"opinion"` and `"Op inion"` all name the same checkbox.

use crate::dates::DateRange;
use crate::dom::DomAccessor;
use crate::errors::{DomError, FilterError};
use crate::search::query::query_param;
use crate::selectors::{
    DATE_RANGE_FACET, FILTER_CHECKBOX, FILTER_DROPDOWN_LIST, FILTER_MULTISELECT_BUTTON,
    filter_form, selected_facet_button, selected_facet_container,
};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use url::Url;

static RANGE_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}").expect("valid range start regex"));
static RANGE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}/\d{2}/\d{4}$").expect("valid range end regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Result type, e.g. article or video.
    Type,
    Section,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Type => "type",
            FilterKind::Section => "section",
        }
    }
}

/// What happened to the requested filter values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Requested values whose checkbox was clicked.
    pub applied: Vec<String>,
    /// Requested values with no matching checkbox.
    pub unknown: Vec<String>,
    /// `Any` was requested, so nothing was selected.
    pub any: bool,
}

fn normalize_value(value: &str) -> String {
    value.split("|nyt:").next().unwrap_or_default().replace(' ', "").to_lowercase()
}

/// Select `items` in the multiselect for `kind` and verify the result.
///
/// Unknown values are logged and skipped. Known values that do not show up
/// as applied facets afterwards fail with
/// [`FilterError::SelectionMismatch`].
#[instrument(level = "info", skip_all, fields(kind = kind.as_str(), requested = items.len()))]
pub fn apply_filter<D: DomAccessor>(
    dom: &mut D,
    kind: FilterKind,
    items: &[String],
) -> Result<FilterOutcome, FilterError> {
    let form = dom.find(&filter_form(kind.as_str()), None)?;
    let button = dom.find(FILTER_MULTISELECT_BUTTON, Some(&form))?;
    dom.click(&button)?;

    let dropdown = dom.find(FILTER_DROPDOWN_LIST, Some(&form))?;
    let mut checkbox_by_value = HashMap::new();
    for checkbox in dom.find_all(FILTER_CHECKBOX, Some(&dropdown))? {
        if let Some(value) = dom.attribute(&checkbox, "value")? {
            checkbox_by_value.insert(normalize_value(&value), checkbox);
        }
    }
    debug!(available = checkbox_by_value.len(), "Indexed filter checkboxes");

    let requested: Vec<&String> = items.iter().unique().collect();
    if requested.iter().any(|item| normalize_value(item) == "any") {
        info!("Any requested; leaving filter unselected");
        return Ok(FilterOutcome {
            any: true,
            ..FilterOutcome::default()
        });
    }

    let mut outcome = FilterOutcome::default();
    for item in requested {
        let clicked = match checkbox_by_value.get(&normalize_value(item)) {
            Some(checkbox) => dom.click(checkbox),
            None => Err(DomError::not_found(item)),
        };
        match clicked {
            Ok(()) => outcome.applied.push(item.clone()),
            Err(e) => {
                debug!(%item, error = %e, "Could not select filter value");
                outcome.unknown.push(item.clone());
            }
        }
    }

    if !outcome.unknown.is_empty() {
        warn!(unknown = ?outcome.unknown, "Unknown {} filters", kind.as_str());
    }

    verify_selected(dom, kind, &outcome.applied)?;
    info!(applied = ?outcome.applied, "Filters applied");
    Ok(outcome)
}

fn verify_selected<D: DomAccessor>(
    dom: &D,
    kind: FilterKind,
    applied: &[String],
) -> Result<(), FilterError> {
    if applied.is_empty() {
        return Ok(());
    }

    let container = dom.find(&selected_facet_container(kind.as_str()), None)?;
    let selected: Vec<String> = dom
        .find_all(&selected_facet_button(kind.as_str()), Some(&container))?
        .iter()
        .filter_map(|facet| dom.attribute(facet, "value").ok().flatten())
        .map(|value| normalize_value(&value))
        .collect();

    let missing: Vec<String> = applied
        .iter()
        .filter(|item| !selected.contains(&normalize_value(item)))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FilterError::SelectionMismatch {
            kind: kind.as_str(),
            missing,
        })
    }
}

/// How many times a failed page check may be retried after a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

impl RetryPolicy {
    pub const ONCE: RetryPolicy = RetryPolicy { max_retries: 1 };
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::ONCE
    }
}

/// Check that the page really shows `range`.
///
/// The URL's `startDate`/`endDate` must match outright. The date facet shown
/// in the UI is allowed to lag: on mismatch the page is reloaded and checked
/// again, up to `policy.max_retries` times.
#[instrument(level = "info", skip_all, fields(range = %range))]
pub fn verify_date_range<D: DomAccessor>(
    dom: &mut D,
    range: &DateRange,
    policy: RetryPolicy,
) -> Result<(), FilterError> {
    let location = dom.location();
    let (start, end) = match Url::parse(&location) {
        Ok(url) => (
            query_param(&url, "startDate").unwrap_or_default(),
            query_param(&url, "endDate").unwrap_or_default(),
        ),
        Err(_) => (String::new(), String::new()),
    };
    if start != range.start_query() || end != range.end_query() {
        return Err(FilterError::DateRangeMismatch {
            expected: format!("{}-{}", range.start_query(), range.end_query()),
            found: format!("{start}-{end}"),
        });
    }

    let mut attempt = 0;
    loop {
        let shown = date_facet_value(dom)?;
        if facet_matches(&shown, range) {
            return Ok(());
        }
        if attempt >= policy.max_retries {
            return Err(FilterError::DateRangeMismatch {
                expected: range.to_string(),
                found: shown,
            });
        }
        attempt += 1;
        warn!(attempt, %shown, "Date range from UI doesn't match; reloading");
        dom.reload()?;
    }
}

fn date_facet_value<D: DomAccessor>(dom: &D) -> Result<String, DomError> {
    let facet = dom.find(DATE_RANGE_FACET, None)?;
    Ok(dom.attribute(&facet, "value")?.unwrap_or_default())
}

fn facet_matches(shown: &str, range: &DateRange) -> bool {
    let shown = shown.trim();
    let start = RANGE_START_RE.find(shown).map(|m| m.as_str());
    let end = RANGE_END_RE.find(shown).map(|m| m.as_str());
    start == Some(range.start_input().as_str()) && end == Some(range.end_input().as_str())
}
