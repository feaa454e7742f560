//! Result-set collection: expand, deduplicate, extract.
//!
//! Runs strictly in order on one page: the list is fully expanded before any
//! result is read, and results are extracted in document order. A result that
//! fails extraction is logged and skipped; only page-level failures (the
//! result list never settling) abort the collection.

use super::dedup::{DedupPolicy, deduplicate};
use super::expander::PaginationExpander;
use super::extractor::ArticleExtractor;
use crate::dom::DomAccessor;
use crate::errors::{DomError, SearchError};
use crate::models::Article;
use crate::selectors::{BASE_URL, ResultSelectors};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub struct ResultSetPipeline {
    selectors: ResultSelectors,
    expander: PaginationExpander,
    extractor: ArticleExtractor,
    policy: DedupPolicy,
}

impl ResultSetPipeline {
    pub fn new(selectors: &ResultSelectors) -> Self {
        Self {
            selectors: *selectors,
            expander: PaginationExpander::new(selectors),
            extractor: ArticleExtractor::new(selectors),
            policy: DedupPolicy::default(),
        }
    }

    pub fn with_expander(mut self, expander: PaginationExpander) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_policy(mut self, policy: DedupPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Collect every unique, extractable article on the page.
    ///
    /// An empty result is not an error; the caller decides how to report it.
    ///
    /// # Arguments
    ///
    /// * `dom` - The results page, expanded in place
    /// * `search_phrase` - The phrase the search ran for
    ///
    /// # Returns
    ///
    /// One [`Article`] per canonical URL, in order of first appearance.
    /// Results without a link or with a missing required field are logged
    /// and left out.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the results container is missing or never
    /// becomes ready after expansion.
    #[instrument(level = "info", skip_all, fields(%search_phrase))]
    pub fn collect<D: DomAccessor>(
        &self,
        dom: &mut D,
        search_phrase: &str,
    ) -> Result<Vec<Article>, SearchError> {
        self.expander.expand(dom)?;

        let base = Url::parse(&dom.location())
            .or_else(|_| Url::parse(BASE_URL))
            .ok();

        let items = self.result_items(dom)?;
        info!(count = items.len(), "All articles count");

        let linked = items.into_iter().filter_map(|element| {
            match self.result_link(dom, &element) {
                Ok(href) => Some((element, href)),
                Err(e) => {
                    warn!(error = %e, "Skipping result without a link");
                    None
                }
            }
        });
        let unique = deduplicate(linked, base.as_ref(), self.policy);
        info!(count = unique.len(), "Unique articles count");

        let mut articles = Vec::with_capacity(unique.len());
        for handle in &unique {
            match self
                .extractor
                .extract(dom, &handle.element, search_phrase, base.as_ref())
            {
                Ok(article) => {
                    debug!(
                        url = handle.url.as_str(),
                        title = article.title(),
                        date = article.raw_date_label(),
                        "Parsed article"
                    );
                    articles.push(article);
                }
                Err(e) => warn!(url = %handle.url, error = %e, "Failed to parse article data"),
            }
        }

        info!(
            parsed = articles.len(),
            skipped = unique.len() - articles.len(),
            "Parsed articles data"
        );
        Ok(articles)
    }

    fn result_items<D: DomAccessor>(&self, dom: &D) -> Result<Vec<D::Element>, SearchError> {
        let container = dom.find(self.selectors.results_container, None)?;
        match dom.find_all(self.selectors.result_item, Some(&container)) {
            Ok(items) => Ok(items),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn result_link<D: DomAccessor>(
        &self,
        dom: &D,
        element: &D::Element,
    ) -> Result<String, DomError> {
        let link = dom.find(self.selectors.result_link, Some(element))?;
        dom.attribute(&link, "href")?
            .ok_or_else(|| DomError::not_found(self.selectors.result_link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::testing::{ScriptedPage, result_item};
    use crate::selectors::RESULTS;

    #[test]
    fn test_end_to_end_dedup_and_skip() {
        let batches = vec![
            [
                result_item(
                    "/2023/05/30/a.html?smid=url",
                    "3h ago",
                    Some("Storm A"),
                    Some("First"),
                    None,
                ),
                result_item(
                    "/2023/05/30/b.html",
                    "5h ago",
                    Some("Storm B"),
                    None,
                    Some("/images/b.jpg"),
                ),
            ]
            .concat(),
            [
                result_item(
                    "/2023/05/30/a.html#comments",
                    "3h ago",
                    Some("Storm A again"),
                    None,
                    None,
                ),
                result_item("/2023/05/29/c.html", "May 29", None, Some("No headline"), None),
            ]
            .concat(),
            result_item("/2023/05/28/d.html", "May 28", Some("Storm D"), None, None),
        ];
        let mut page = ScriptedPage::paginated(batches);

        let articles = ResultSetPipeline::new(&RESULTS)
            .collect(&mut page, "Storm")
            .unwrap();

        let titles: Vec<&str> = articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, vec!["Storm A", "Storm B", "Storm D"]);
        assert_eq!(page.revealed(), 3);
        assert_eq!(
            articles[1].image_url(),
            Some("https://www.nytimes.com/images/b.jpg")
        );
    }

    #[test]
    fn test_last_wins_policy_keeps_later_duplicate() {
        let batches = vec![
            [
                result_item("/a.html", "3h ago", Some("Old copy"), None, None),
                result_item("/b.html", "3h ago", Some("Other"), None, None),
                result_item("/a.html?x=1", "3h ago", Some("New copy"), None, None),
            ]
            .concat(),
        ];
        let mut page = ScriptedPage::paginated(batches);
        let articles = ResultSetPipeline::new(&RESULTS)
            .with_policy(DedupPolicy::LastWins)
            .collect(&mut page, "copy")
            .unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title()).collect();
        assert_eq!(titles, vec!["New copy", "Other"]);
    }

    #[test]
    fn test_result_without_link_is_skipped() {
        let batches = vec![
            [
                concat!(
                    r#"<li data-testid="search-bodega-result">"#,
                    r#"<span data-testid="todays-date">May 1</span><h4>Loose</h4></li>"#
                )
                .to_string(),
                result_item("/kept.html", "May 2", Some("Kept"), None, None),
            ]
            .concat(),
        ];
        let mut page = ScriptedPage::paginated(batches);
        let articles = ResultSetPipeline::new(&RESULTS).collect(&mut page, "x").unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title(), "Kept");
    }

    #[test]
    fn test_empty_result_list_is_not_an_error() {
        let mut page = ScriptedPage::paginated(Vec::new());
        let articles = ResultSetPipeline::new(&RESULTS).collect(&mut page, "nothing").unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_missing_result_list_aborts() {
        let mut page = ScriptedPage::without_results();
        let err = ResultSetPipeline::new(&RESULTS)
            .with_expander(
                PaginationExpander::new(&RESULTS)
                    .with_settle_timeout(std::time::Duration::from_millis(10)),
            )
            .collect(&mut page, "x")
            .unwrap_err();
        assert!(matches!(err, SearchError::ResultsNotReady(_)));
    }
}
