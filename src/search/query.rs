//! Search URL construction.

use crate::dates::DateRange;
use crate::selectors::SEARCH_URL;
use url::Url;

/// Search URL for `phrase` restricted to `range`, newest results first.
///
/// # Examples
///
/// ```ignore
/// let url = search_url("climate change", &range)?;
/// // https://www.nytimes.com/search?query=climate+change&sort=newest
/// //     &startDate=20230301&endDate=20230530
/// ```
pub fn search_url(phrase: &str, range: &DateRange) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(SEARCH_URL)?;
    url.query_pairs_mut()
        .append_pair("query", phrase)
        .append_pair("sort", "newest")
        .append_pair("startDate", &range.start_query())
        .append_pair("endDate", &range.end_query());
    Ok(url)
}

/// Value of the first query parameter called `name`.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
