//! Field extraction for a single search result.
//!
//! | Field | Required | On lookup failure |
//! |-------|----------|-------------------|
//! | date label | yes | [`ExtractionError::MissingField`] |
//! | title | yes | [`ExtractionError::MissingField`] |
//! | description | no | `None`, logged at warn |
//! | image URL | no | `None`, logged at debug |
//!
//! A failing optional field never costs the whole record.

use super::dedup::CanonicalUrl;
use crate::dom::DomAccessor;
use crate::errors::{DomError, ExtractionError};
use crate::models::Article;
use crate::selectors::ResultSelectors;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    selectors: ResultSelectors,
}

impl ArticleExtractor {
    pub fn new(selectors: &ResultSelectors) -> Self {
        Self {
            selectors: *selectors,
        }
    }

    /// Build an [`Article`] from one result element.
    ///
    /// Relative image sources are resolved against `base` before their query
    /// string and fragment are dropped.
    ///
    /// # Arguments
    ///
    /// * `dom` - The page the element belongs to
    /// * `element` - One search result element
    /// * `search_phrase` - The phrase the search ran for, stored on the article
    /// * `base` - URL that relative image sources resolve against
    ///
    /// # Returns
    ///
    /// An [`Article`] with `description` and `image_url` set to `None` when
    /// their nodes are absent.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::MissingField`] if the date or title node is missing
    /// - [`ExtractionError::EmptyField`] if either one has no text
    pub fn extract<D: DomAccessor>(
        &self,
        dom: &D,
        element: &D::Element,
        search_phrase: &str,
        base: Option<&Url>,
    ) -> Result<Article, ExtractionError> {
        let date = required_text(dom, element, self.selectors.date, "date")?;
        let title = required_text(dom, element, self.selectors.title, "title")?;

        let description = match optional_text(dom, element, self.selectors.description) {
            Ok(description) => description,
            Err(e) => {
                warn!(%title, error = %e, "No description found");
                None
            }
        };

        let image_url = match dom
            .find(self.selectors.image, Some(element))
            .and_then(|img| dom.attribute(&img, "src"))
        {
            Ok(Some(src)) if !src.trim().is_empty() => {
                Some(CanonicalUrl::parse(&src, base).to_string())
            }
            Ok(_) => None,
            Err(e) => {
                debug!(%title, error = %e, "No picture found");
                None
            }
        };

        Ok(Article::new(search_phrase, date, title, description, image_url))
    }
}

fn required_text<D: DomAccessor>(
    dom: &D,
    element: &D::Element,
    selector: &str,
    field: &'static str,
) -> Result<String, ExtractionError> {
    let node = dom
        .find(selector, Some(element))
        .map_err(|source| ExtractionError::MissingField { field, source })?;
    let text = dom
        .text(&node)
        .map_err(|source| ExtractionError::MissingField { field, source })?;
    if text.is_empty() {
        return Err(ExtractionError::EmptyField { field });
    }
    Ok(text)
}

fn optional_text<D: DomAccessor>(
    dom: &D,
    element: &D::Element,
    selector: &str,
) -> Result<Option<String>, DomError> {
    let node = dom.find(selector, Some(element))?;
    let text = dom.text(&node)?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}
