//! Canonical-URL deduplication of search results.
//!
//! Paginated result lists repeat entries: the same article can show up in two
//! batches, or with different tracking parameters on its link. Results are
//! keyed by their [`CanonicalUrl`] (scheme, host and path only) and reduced to
//! one handle per key.

use itertools::Itertools;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use url::Url;

/// A URL without query string or fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Canonicalize `raw`, resolving it against `base` first when it is
    /// relative.
    ///
    /// Input that cannot be parsed as a URL is cut at the first `?` or `#`,
    /// so the key stays stable either way.
    pub fn parse(raw: &str, base: Option<&Url>) -> Self {
        let raw = raw.trim();
        let parsed = match base {
            Some(base) => base.join(raw),
            None => Url::parse(raw),
        };
        match parsed {
            Ok(mut url) => {
                url.set_query(None);
                url.set_fragment(None);
                CanonicalUrl(url.into())
            }
            Err(_) => {
                let end = raw.find(['?', '#']).unwrap_or(raw.len());
                CanonicalUrl(raw[..end].to_string())
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which handle survives when several results share a canonical URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Keep the first handle seen, in traversal order.
    #[default]
    FirstWins,
    /// Keep the position of the first appearance but the handle of the last.
    LastWins,
}

/// One on-page result paired with its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultHandle<H> {
    pub element: H,
    pub url: CanonicalUrl,
}

/// Reduce `items` to at most one handle per canonical URL, ordered by first
/// appearance.
///
/// # Arguments
///
/// * `items` - Result handles paired with their raw link, in page order
/// * `base` - URL that relative links resolve against
/// * `policy` - Which handle survives when a canonical URL repeats
///
/// # Returns
///
/// As many handles as there are distinct canonical URLs.
///
/// # Examples
///
/// ```ignore
/// let unique = deduplicate(
///     vec![(1, "/a.html?x=1".into()), (2, "/a.html#top".into())],
///     Some(&base),
///     DedupPolicy::FirstWins,
/// );
/// assert_eq!(unique.len(), 1);
/// assert_eq!(unique[0].element, 1);
/// ```
pub fn deduplicate<H, I>(items: I, base: Option<&Url>, policy: DedupPolicy) -> Vec<ResultHandle<H>>
where
    I: IntoIterator<Item = (H, String)>,
{
    let handles = items.into_iter().map(|(element, raw)| ResultHandle {
        element,
        url: CanonicalUrl::parse(&raw, base),
    });

    match policy {
        DedupPolicy::FirstWins => handles.unique_by(|handle| handle.url.clone()).collect(),
        DedupPolicy::LastWins => {
            let mut kept: Vec<ResultHandle<H>> = Vec::new();
            let mut position: HashMap<CanonicalUrl, usize> = HashMap::new();
            for handle in handles {
                match position.entry(handle.url.clone()) {
                    Entry::Occupied(slot) => kept[*slot.get()] = handle,
                    Entry::Vacant(slot) => {
                        slot.insert(kept.len());
                        kept.push(handle);
                    }
                }
            }
            kept
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.nytimes.com/search?query=climate").unwrap()
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        let story = "https://www.nytimes.com/2023/05/30/us/storm.html";
        let a = CanonicalUrl::parse(&format!("{story}?smid=url"), None);
        let b = CanonicalUrl::parse(&format!("{story}#comments"), None);
        let c = CanonicalUrl::parse(
            "https://www.nytimes.com/2023/05/30/us/storm.html?searchResultPosition=4#top",
            None,
        );
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "https://www.nytimes.com/2023/05/30/us/storm.html");
    }

    #[test]
    fn test_different_paths_stay_distinct() {
        let a = CanonicalUrl::parse("https://www.nytimes.com/a.html?x=1", None);
        let b = CanonicalUrl::parse("https://www.nytimes.com/b.html?x=1", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_relative_links_resolve_against_base() {
        let base = base();
        let url = CanonicalUrl::parse("/2023/05/30/us/storm.html?smid=url", Some(&base));
        assert_eq!(url.as_str(), "https://www.nytimes.com/2023/05/30/us/storm.html");
    }

    #[test]
    fn test_unparsable_input_is_cut_at_query() {
        let url = CanonicalUrl::parse("/2023/05/30/us/storm.html?smid=url#x", None);
        assert_eq!(url.as_str(), "/2023/05/30/us/storm.html");
    }

    #[test]
    fn test_first_wins_keeps_first_handle_in_order() {
        let items = vec![
            (1, "https://x.com/a?p=1".to_string()),
            (2, "https://x.com/b".to_string()),
            (3, "https://x.com/a?p=2".to_string()),
            (4, "https://x.com/c#frag".to_string()),
            (5, "https://x.com/b?again".to_string()),
        ];
        let unique = deduplicate(items, None, DedupPolicy::FirstWins);
        let elements: Vec<i32> = unique.iter().map(|h| h.element).collect();
        assert_eq!(elements, vec![1, 2, 4]);
        assert_eq!(unique[2].url.as_str(), "https://x.com/c");
    }

    #[test]
    fn test_last_wins_keeps_last_handle_at_first_position() {
        let items = vec![
            (1, "https://x.com/a".to_string()),
            (2, "https://x.com/b".to_string()),
            (3, "https://x.com/a?dup".to_string()),
        ];
        let unique = deduplicate(items, None, DedupPolicy::LastWins);
        let elements: Vec<i32> = unique.iter().map(|h| h.element).collect();
        assert_eq!(elements, vec![3, 2]);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<(i32, String)> = Vec::new();
        assert!(deduplicate(items.clone(), None, DedupPolicy::FirstWins).is_empty());
        assert!(deduplicate(items, None, DedupPolicy::LastWins).is_empty());
    }
}
