//! Search-results discovery and article extraction.
//!
//! The work on a results page follows a fixed sequence:
//!
//! 1. **Filters** ([`filters`]): select categories/sections and confirm the
//!    date range the page shows
//! 2. **Expansion** ([`expander`]): click "show more" until the full list is loaded
//! 3. **Deduplication** ([`dedup`]): one result per canonical URL
//! 4. **Extraction** ([`extractor`]): one [`crate::models::Article`] per result
//!
//! [`pipeline::ResultSetPipeline`] runs steps 2 to 4. All of it is synchronous
//! against a single [`crate::dom::DomAccessor`].

pub mod dedup;
pub mod expander;
pub mod extractor;
pub mod filters;
pub mod pipeline;
pub mod query;
