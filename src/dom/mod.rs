//! Page access abstraction.
//!
//! Everything that reads or drives the results page goes through
//! [`DomAccessor`]. The search logic only depends on the semantic role of each
//! selector, never on how a page is backed.
//!
//! # Implementations
//!
//! | Type | Backing | Notes |
//! |------|---------|-------|
//! | [`html::HtmlPage`] | Parsed HTML snapshot | Read-only; `click` is unsupported |
//! | `testing::ScriptedPage` | In-memory HTML (tests only) | Simulates "show more" pagination |
//!
//! All calls are synchronous. A page is a single shared session, so callers
//! interact with it strictly one call at a time.

use crate::errors::DomError;
use std::fmt::Debug;
use std::time::Duration;

pub mod html;

#[cfg(test)]
pub mod testing;

/// Element lookup, inspection and interaction on one page.
///
/// Every lookup fails with [`DomError::NotFound`] when the selector matches
/// nothing, including [`DomAccessor::find_all`].
pub trait DomAccessor {
    /// Opaque handle to one element of the current page.
    type Element: Clone + Debug;

    /// First element matching `selector`, searched inside `scope` when given.
    fn find(&self, selector: &str, scope: Option<&Self::Element>)
    -> Result<Self::Element, DomError>;

    /// Every element matching `selector` in document order.
    fn find_all(
        &self,
        selector: &str,
        scope: Option<&Self::Element>,
    ) -> Result<Vec<Self::Element>, DomError>;

    /// Visible text of an element with whitespace collapsed.
    fn text(&self, element: &Self::Element) -> Result<String, DomError>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>, DomError>;

    fn click(&mut self, element: &Self::Element) -> Result<(), DomError>;

    fn scroll_into_view(&mut self, element: &Self::Element) -> Result<(), DomError>;

    /// Whether `selector` matches an element that can be interacted with.
    fn is_enabled(&self, selector: &str) -> bool;

    fn wait_until_enabled(&mut self, selector: &str, timeout: Duration) -> Result<(), DomError>;

    fn reload(&mut self) -> Result<(), DomError>;

    /// URL of the page currently loaded.
    fn location(&self) -> String;
}
