//! [`DomAccessor`] over a parsed HTML snapshot.
//!
//! The snapshot comes either from an HTTP fetch of the search URL or from a
//! results page saved to disk. Handles are `ego_tree` node ids into the parsed
//! document, so they stay cheap to copy and survive borrowing the page mutably.

use super::DomAccessor;
use crate::errors::DomError;
use ego_tree::NodeId;
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};

/// A results page captured as HTML.
pub struct HtmlPage {
    url: String,
    source: String,
    document: Html,
}

impl HtmlPage {
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let document = Html::parse_document(&source);
        Self {
            url: url.into(),
            source,
            document,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the captured markup, as a navigation would.
    #[cfg(test)]
    pub fn replace_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.document = Html::parse_document(&self.source);
    }

    fn selector(selector: &str) -> Result<Selector, DomError> {
        Selector::parse(selector).map_err(|e| DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    }

    fn element(&self, id: NodeId) -> Result<ElementRef<'_>, DomError> {
        self.document
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .ok_or(DomError::Stale)
    }

    fn select_ids(&self, selector: &str, scope: Option<&NodeId>) -> Result<Vec<NodeId>, DomError> {
        let parsed = Self::selector(selector)?;
        let ids = match scope {
            Some(id) => self
                .element(*id)?
                .select(&parsed)
                .map(|el| el.id())
                .collect(),
            None => self.document.select(&parsed).map(|el| el.id()).collect(),
        };
        Ok(ids)
    }
}

impl DomAccessor for HtmlPage {
    type Element = NodeId;

    fn find(&self, selector: &str, scope: Option<&NodeId>) -> Result<NodeId, DomError> {
        self.select_ids(selector, scope)?
            .into_iter()
            .next()
            .ok_or_else(|| DomError::not_found(selector))
    }

    fn find_all(&self, selector: &str, scope: Option<&NodeId>) -> Result<Vec<NodeId>, DomError> {
        let ids = self.select_ids(selector, scope)?;
        if ids.is_empty() {
            return Err(DomError::not_found(selector));
        }
        Ok(ids)
    }

    fn text(&self, element: &NodeId) -> Result<String, DomError> {
        let el = self.element(*element)?;
        Ok(el.text().flat_map(str::split_whitespace).join(" "))
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Result<Option<String>, DomError> {
        let el = self.element(*element)?;
        Ok(el.value().attr(name).map(str::to_string))
    }

    fn click(&mut self, _element: &NodeId) -> Result<(), DomError> {
        Err(DomError::Unsupported("click"))
    }

    fn scroll_into_view(&mut self, element: &NodeId) -> Result<(), DomError> {
        self.element(*element).map(|_| ())
    }

    fn is_enabled(&self, selector: &str) -> bool {
        self.find(selector, None)
            .and_then(|id| self.element(id))
            .map(|el| el.value().attr("disabled").is_none())
            .unwrap_or(false)
    }

    fn wait_until_enabled(&mut self, selector: &str, timeout: Duration) -> Result<(), DomError> {
        // A snapshot never changes, so one look is as good as waiting.
        self.find(selector, None)?;
        if self.is_enabled(selector) {
            Ok(())
        } else {
            Err(DomError::Timeout {
                selector: selector.to_string(),
                timeout,
            })
        }
    }

    #[instrument(level = "debug", skip_all, fields(url = %self.url))]
    fn reload(&mut self) -> Result<(), DomError> {
        debug!(bytes = self.source.len(), "Re-parsing captured page");
        self.document = Html::parse_document(&self.source);
        Ok(())
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div data-testid="search-results">
            <ol>
              <li data-testid="search-bodega-result">
                <a href="/2023/05/30/one.html?smid=url">
                  <h4>First   headline</h4><p>Kicker</p><p>Second paragraph</p>
                </a>
              </li>
              <li data-testid="search-bodega-result">
                <a href="/2023/05/29/two.html"><h4>Second headline</h4></a>
              </li>
            </ol>
          </div>
          <button data-testid="search-show-more-button" disabled>Show More</button>
        </body></html>
    "#;

    fn page() -> HtmlPage {
        HtmlPage::new("https://www.nytimes.com/search?query=test", PAGE)
    }

    #[test]
    fn test_find_scoped_text_and_attribute() {
        let page = page();
        let results = page
            .find_all(r#"[data-testid="search-bodega-result"]"#, None)
            .unwrap();
        assert_eq!(results.len(), 2);

        let title = page.find("a > h4", Some(&results[0])).unwrap();
        assert_eq!(page.text(&title).unwrap(), "First headline");

        let link = page.find("a", Some(&results[1])).unwrap();
        assert_eq!(
            page.attribute(&link, "href").unwrap().as_deref(),
            Some("/2023/05/29/two.html")
        );
        assert_eq!(page.attribute(&link, "title").unwrap(), None);

        let description = page.find("a p:nth-child(3)", Some(&results[0])).unwrap();
        assert_eq!(page.text(&description).unwrap(), "Second paragraph");
    }

    #[test]
    fn test_lookups_report_not_found() {
        let page = page();
        let results = page
            .find_all(r#"[data-testid="search-bodega-result"]"#, None)
            .unwrap();
        assert!(page.find("img", Some(&results[1])).unwrap_err().is_not_found());
        assert!(page.find_all("table", None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_selector() {
        let page = page();
        assert!(matches!(
            page.find("a >>> h4", None),
            Err(DomError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_disabled_and_missing_controls_are_not_enabled() {
        let mut page = page();
        assert!(!page.is_enabled(r#"[data-testid="search-show-more-button"]"#));
        assert!(!page.is_enabled("#nope"));
        assert!(page.is_enabled(r#"[data-testid="search-results"]"#));
        assert!(
            page.wait_until_enabled(r#"[data-testid="search-results"]"#, Duration::from_secs(10))
                .is_ok()
        );
        assert!(matches!(
            page.wait_until_enabled(
                r#"[data-testid="search-show-more-button"]"#,
                Duration::from_secs(10)
            ),
            Err(DomError::Timeout { .. })
        ));
    }

    #[test]
    fn test_click_is_unsupported_on_snapshot() {
        let mut page = page();
        let button = page
            .find(r#"[data-testid="search-show-more-button"]"#, None)
            .unwrap();
        assert!(matches!(page.click(&button), Err(DomError::Unsupported("click"))));
        assert!(page.scroll_into_view(&button).is_ok());
    }

    #[test]
    fn test_reload_keeps_page_and_location() {
        let mut page = page();
        page.reload().unwrap();
        assert_eq!(page.location(), "https://www.nytimes.com/search?query=test");
        assert_eq!(
            page.find_all(r#"[data-testid="search-bodega-result"]"#, None)
                .unwrap()
                .len(),
            2
        );
    }
}
