//! Scripted page used by unit tests.
//!
//! Wraps an [`HtmlPage`] and re-renders it whenever a click changes what a real
//! results page would show: each "show more" click reveals the next batch of
//! results until none are left, at which point the button disappears.

use super::DomAccessor;
use super::html::HtmlPage;
use crate::errors::DomError;
use ego_tree::NodeId;
use std::time::Duration;

pub const SEARCH_URL: &str =
    "https://www.nytimes.com/search?query=climate&sort=newest&startDate=20230501&endDate=20230530";

pub struct ScriptedPage {
    page: HtmlPage,
    header: String,
    batches: Vec<String>,
    revealed: usize,
    with_container: bool,
    /// Clicks succeed but never reveal anything, like a broken button.
    stuck_show_more: bool,
    /// Every click fails.
    pub fail_clicks: bool,
    /// Markup swapped in for `header` on the next reload.
    pub header_after_reload: Option<String>,
    /// `value` (or `data-testid`) of every clicked element, in order.
    pub clicked: Vec<String>,
    pub reloads: usize,
}

impl ScriptedPage {
    /// A results page whose first batch is visible and the rest are behind
    /// "show more".
    pub fn paginated(batches: Vec<String>) -> Self {
        Self::build(String::new(), batches, true)
    }

    /// A page with fixed markup above an empty result list.
    pub fn with_header(header: impl Into<String>) -> Self {
        Self::build(header.into(), Vec::new(), true)
    }

    /// A page without the results container at all.
    pub fn without_results() -> Self {
        Self::build(String::new(), Vec::new(), false)
    }

    fn build(header: String, batches: Vec<String>, with_container: bool) -> Self {
        let mut scripted = Self {
            page: HtmlPage::new(SEARCH_URL, ""),
            header,
            batches,
            revealed: 1,
            with_container,
            stuck_show_more: false,
            fail_clicks: false,
            header_after_reload: None,
            clicked: Vec::new(),
            reloads: 0,
        };
        scripted.render();
        scripted
    }

    /// Keep "show more" on the page forever; clicks on it change nothing.
    pub fn stuck(mut self) -> Self {
        self.stuck_show_more = true;
        self.render();
        self
    }

    pub fn at(mut self, url: &str) -> Self {
        let source = self.page.source().to_string();
        self.page = HtmlPage::new(url, source);
        self
    }

    pub fn revealed(&self) -> usize {
        self.revealed.min(self.batches.len())
    }

    fn has_more(&self) -> bool {
        self.stuck_show_more || self.revealed < self.batches.len()
    }

    fn render(&mut self) {
        let items: String = self.batches.iter().take(self.revealed).cloned().collect();
        let results = if self.with_container {
            format!(r#"<div data-testid="search-results"><ol>{items}</ol></div>"#)
        } else {
            String::new()
        };
        let button = if self.has_more() {
            r#"<button data-testid="search-show-more-button">Show More</button>"#
        } else {
            ""
        };
        self.page.replace_source(format!(
            "<html><body>{}{results}{button}</body></html>",
            self.header
        ));
    }
}

impl DomAccessor for ScriptedPage {
    type Element = NodeId;

    fn find(&self, selector: &str, scope: Option<&NodeId>) -> Result<NodeId, DomError> {
        self.page.find(selector, scope)
    }

    fn find_all(&self, selector: &str, scope: Option<&NodeId>) -> Result<Vec<NodeId>, DomError> {
        self.page.find_all(selector, scope)
    }

    fn text(&self, element: &NodeId) -> Result<String, DomError> {
        self.page.text(element)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Result<Option<String>, DomError> {
        self.page.attribute(element, name)
    }

    fn click(&mut self, element: &NodeId) -> Result<(), DomError> {
        if self.fail_clicks {
            return Err(DomError::Unsupported("click"));
        }
        let test_id = self.page.attribute(element, "data-testid")?;
        let label = match self.page.attribute(element, "value")? {
            Some(value) => value,
            None => test_id.clone().unwrap_or_default(),
        };
        self.clicked.push(label);

        if test_id.as_deref() == Some("search-show-more-button") && !self.stuck_show_more {
            self.revealed += 1;
            self.render();
        }
        Ok(())
    }

    fn scroll_into_view(&mut self, element: &NodeId) -> Result<(), DomError> {
        self.page.scroll_into_view(element)
    }

    fn is_enabled(&self, selector: &str) -> bool {
        self.page.is_enabled(selector)
    }

    fn wait_until_enabled(&mut self, selector: &str, timeout: Duration) -> Result<(), DomError> {
        self.page.wait_until_enabled(selector, timeout)
    }

    fn reload(&mut self) -> Result<(), DomError> {
        self.reloads += 1;
        if let Some(header) = self.header_after_reload.take() {
            self.header = header;
        }
        self.render();
        Ok(())
    }

    fn location(&self) -> String {
        self.page.location()
    }
}

/// Markup of one search result as the results page renders it.
pub fn result_item(
    href: &str,
    date: &str,
    title: Option<&str>,
    description: Option<&str>,
    image: Option<&str>,
) -> String {
    let date = format!(r#"<span data-testid="todays-date">{date}</span>"#);
    let title = title.map(|t| format!("<h4>{t}</h4>")).unwrap_or_default();
    let description = description.map(|d| format!("<p>{d}</p>")).unwrap_or_default();
    let image = image
        .map(|src| format!(r#"<figure><img src="{src}" alt=""></figure>"#))
        .unwrap_or_default();
    format!(
        concat!(
            r#"<li data-testid="search-bodega-result"><div>{}<div>"#,
            r#"<a href="{}">{}{}</a>{}</div></div></li>"#
        ),
        date, href, title, description, image
    )
}
