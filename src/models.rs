//! Data models for extracted search results.
//!
//! - [`Article`]: one search result as read off the page, immutable once built
//! - [`ArticleRow`]: the spreadsheet/JSON row materialized from an article
//!
//! Everything beyond the raw fields (normalized date, money mention, phrase
//! count, picture file name) is derived on demand from the raw text.

use crate::dates::{self, ROW_DATE_FORMAT};
use crate::errors::DateParseError;
use crate::text;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const NO_DESCRIPTION: &str = "No description found";
pub const NO_PICTURE: &str = "No picture found";

/// One search result.
///
/// `title` is always present. `description` and `image_url` are `None` when
/// the result has no such node; `image_url` is stored without query string or
/// fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    search_phrase: String,
    raw_date_label: String,
    title: String,
    description: Option<String>,
    image_url: Option<String>,
}

impl Article {
    pub fn new(
        search_phrase: impl Into<String>,
        raw_date_label: impl Into<String>,
        title: impl Into<String>,
        description: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        Self {
            search_phrase: search_phrase.into(),
            raw_date_label: raw_date_label.into(),
            title: title.into(),
            description,
            image_url,
        }
    }

    pub fn search_phrase(&self) -> &str {
        &self.search_phrase
    }

    pub fn raw_date_label(&self) -> &str {
        &self.raw_date_label
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn normalized_date(&self, now: NaiveDateTime) -> Result<NaiveDateTime, DateParseError> {
        dates::normalize(&self.raw_date_label, now)
    }

    pub fn contains_money(&self) -> bool {
        text::contains_money(&self.title, self.description())
    }

    pub fn phrase_occurrence_count(&self) -> usize {
        text::phrase_occurrence_count(&self.search_phrase, &self.title, self.description())
    }

    /// File name the picture is saved under, if the article has one.
    pub fn picture_filename(&self) -> Option<String> {
        text::filename_from_url(self.image_url())
    }

    /// Materialize the export row, resolving the date label against `now`.
    ///
    /// An unparsable date label is kept verbatim in the `Date` column so the
    /// article still reaches the spreadsheet.
    pub fn to_row(&self, now: NaiveDateTime) -> ArticleRow {
        let date = match self.normalized_date(now) {
            Ok(date) => date.format(ROW_DATE_FORMAT).to_string(),
            Err(e) => {
                warn!(
                    search_phrase = %self.search_phrase(),
                    label = %self.raw_date_label(),
                    error = %e,
                    "Keeping raw date label"
                );
                self.raw_date_label().to_string()
            }
        };

        ArticleRow {
            date,
            title: self.title.clone(),
            search_phrases_count: self.phrase_occurrence_count(),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            contains_money: self.contains_money(),
            picture_filename: self
                .picture_filename()
                .unwrap_or_else(|| NO_PICTURE.to_string()),
        }
    }
}

/// One exported row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Search Phrases Count")]
    pub search_phrases_count: usize,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Contains Money")]
    pub contains_money: bool,
    #[serde(rename = "Picture Filename")]
    pub picture_filename: String,
}

impl ArticleRow {
    pub const HEADERS: [&'static str; 6] = [
        "Date",
        "Title",
        "Search Phrases Count",
        "Description",
        "Contains Money",
        "Picture Filename",
    ];
}
