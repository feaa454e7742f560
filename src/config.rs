//! Run configuration.
//!
//! A run is described by a YAML work item and/or command-line flags. Both are
//! folded once, at startup, into a validated [`RunConfig`] that the rest of the
//! program takes by value.

use crate::cli::Cli;
use crate::errors::ConfigError;
use crate::search::dedup::DedupPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Months searched when neither the work item nor the CLI says otherwise.
pub const DEFAULT_MONTHS: u32 = 1;

/// A work item as read from YAML.
///
/// ```yaml
/// search_phrase: climate
/// categories: [Article]
/// sections: [Climate, Science]
/// number_of_month: 2
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct WorkItem {
    #[serde(default)]
    pub search_phrase: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub sections: Vec<String>,
    /// Signed so a negative value is reported as invalid instead of a parse error.
    #[serde(default)]
    pub number_of_month: Option<i64>,
}

impl WorkItem {
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let item = Self::from_yaml(&raw)?;
        debug!(?item, "Loaded work item");
        Ok(item)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub search_phrase: String,
    pub categories: Vec<String>,
    pub sections: Vec<String>,
    pub months: u32,
    pub output_dir: PathBuf,
    pub html: Option<PathBuf>,
    pub max_expansions: usize,
    pub settle_timeout: Duration,
    pub dedup_policy: DedupPolicy,
    pub verify_date_range: bool,
}

impl RunConfig {
    /// Build the run configuration from the CLI, loading `--work-item` if given.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let item = match &cli.work_item {
            Some(path) => WorkItem::load(path)?,
            None => WorkItem::default(),
        };
        Self::merge(cli, item)
    }

    /// Fold `item` under the CLI flags. Non-empty CLI values win.
    pub fn merge(cli: &Cli, item: WorkItem) -> Result<Self, ConfigError> {
        let search_phrase = cli
            .search_phrase
            .clone()
            .or(item.search_phrase)
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingSearchPhrase)?;

        let categories = clean_list(if cli.categories.is_empty() {
            item.categories
        } else {
            cli.categories.clone()
        });
        let sections = clean_list(if cli.sections.is_empty() {
            item.sections
        } else {
            cli.sections.clone()
        });

        let months = match (cli.months, item.number_of_month) {
            (Some(m), _) => m,
            (None, Some(m)) => u32::try_from(m).map_err(|_| {
                ConfigError::Invalid(format!(
                    "number_of_month must be between 0 and {}, got {m}",
                    u32::MAX
                ))
            })?,
            (None, None) => DEFAULT_MONTHS,
        };

        if cli.max_expansions == 0 {
            return Err(ConfigError::Invalid("max_expansions must be at least 1".into()));
        }

        let config = Self {
            search_phrase,
            categories,
            sections,
            months,
            output_dir: cli.output_dir.clone(),
            html: cli.html.clone(),
            max_expansions: cli.max_expansions,
            settle_timeout: Duration::from_secs(cli.settle_timeout_secs),
            dedup_policy: if cli.keep_last_duplicate {
                DedupPolicy::LastWins
            } else {
                DedupPolicy::FirstWins
            },
            verify_date_range: !cli.no_verify,
        };
        info!(
            search_phrase = %config.search_phrase,
            categories = ?config.categories,
            sections = ?config.sections,
            months = config.months,
            "Resolved run configuration"
        );
        Ok(config)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join("images")
    }
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
