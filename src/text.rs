//! Pure classification helpers over an article's raw text.
//!
//! Title and description are always joined the same way before inspection:
//! the title, then a single space and the description when one exists.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// A dollar sign followed by an amount, or an amount followed by
/// `dollars`/`USD`. Matching is case-sensitive.
static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[\d,.]+|\d+\s?(dollars|USD)").expect("valid money regex"));

fn joined_text(title: &str, description: Option<&str>) -> String {
    match description {
        Some(description) if !description.is_empty() => format!("{title} {description}"),
        _ => title.to_string(),
    }
}

/// Whether the title or description mentions an amount of money.
///
/// # Examples
///
/// ```ignore
/// assert!(contains_money("Sale: $19.99", None));
/// assert!(contains_money("Pay 5 dollars now", None));
/// assert!(!contains_money("Sale today", None));
/// ```
pub fn contains_money(title: &str, description: Option<&str>) -> bool {
    MONEY_RE.is_match(&joined_text(title, description))
}

/// Count non-overlapping, case-sensitive occurrences of `phrase` in the
/// title and description.
///
/// This is plain substring counting: no word boundaries, no case folding.
pub fn phrase_occurrence_count(phrase: &str, title: &str, description: Option<&str>) -> usize {
    joined_text(title, description).matches(phrase).count()
}

/// Last path segment of `url`, or `None` when there is no URL or the path
/// ends without a file name.
pub fn filename_from_url(url: Option<&str>) -> Option<String> {
    let url = url?;
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
