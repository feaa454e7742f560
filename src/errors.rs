//! Error types for every stage of a harvest run.
//!
//! Failures are split by the scope they affect:
//!
//! - [`DomError`]: a single page interaction failed. Optional fields swallow it,
//!   required fields turn it into an [`ExtractionError`].
//! - [`ExtractionError`]: one result element could not become an article. The
//!   pipeline logs it and moves on to the next element.
//! - [`SearchError`] and [`FilterError`]: page-level setup failed and the run
//!   stops.
//! - [`RunError`]: a named step of the run failed; produced by
//!   [`crate::utils::timed_step`].

use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// A page lookup or interaction failed.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("no element matches selector `{selector}`")]
    NotFound { selector: String },

    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("element handle no longer points at an element")]
    Stale,

    #[error("operation `{0}` is not supported by this page")]
    Unsupported(&'static str),

    #[error("`{selector}` did not become enabled within {timeout:?}")]
    Timeout { selector: String, timeout: Duration },
}

impl DomError {
    pub fn not_found(selector: &str) -> Self {
        DomError::NotFound {
            selector: selector.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomError::NotFound { .. })
    }
}

/// A required field of one search result could not be read.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("required field `{field}` not found: {source}")]
    MissingField {
        field: &'static str,
        #[source]
        source: DomError,
    },

    #[error("required field `{field}` is empty")]
    EmptyField { field: &'static str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateParseError {
    #[error("unrecognized date label `{0}`")]
    Unrecognized(String),

    #[error("date label `{0}` does not name a valid calendar date")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("search results never became ready: {0}")]
    ResultsNotReady(#[source] DomError),
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("selected {kind} items don't match, missing: {missing:?}")]
    SelectionMismatch {
        kind: &'static str,
        missing: Vec<String>,
    },

    #[error("date range mismatch: expected {expected}, page shows {found}")]
    DateRangeMismatch { expected: String, found: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read work item: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse work item: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("no search_phrase provided")]
    MissingSearchPhrase,

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot derive a file name from `{0}`")]
    NoFileName(String),
}

/// A named step of the run failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("[{step}] {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}
