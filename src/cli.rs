//! Command-line interface definitions for the news search harvester.
//!
//! Every option can also come from an environment variable. Values given
//! here override the matching keys of the `--work-item` YAML file.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for one harvesting run.
///
/// # Examples
///
/// ```sh
/// # Everything from a work item file
/// news_search_harvest --work-item work_item.yaml
///
/// # Inline, two sections, last three months
/// news_search_harvest --search-phrase climate --section Climate --section Science --months 3
///
/// # Offline, against a saved results page
/// news_search_harvest --search-phrase climate --html saved_search.html --no-verify
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML work item (search_phrase, categories, sections, number_of_month)
    #[arg(short, long, env = "WORK_ITEM")]
    pub work_item: Option<PathBuf>,

    /// Phrase to search for
    #[arg(short, long, env = "SEARCH_PHRASE")]
    pub search_phrase: Option<String>,

    /// News category (type) filter; repeat for several
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// News section filter; repeat for several
    #[arg(long = "section")]
    pub sections: Vec<String>,

    /// Number of months to search back, 0 and 1 both meaning the current month
    #[arg(long, env = "NUMBER_OF_MONTH")]
    pub months: Option<u32>,

    /// Directory for the spreadsheet, JSON file and pictures
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Read the results page from a saved HTML file instead of fetching it
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Upper bound on "show more" clicks
    #[arg(long, default_value_t = crate::search::expander::DEFAULT_MAX_EXPANSIONS)]
    pub max_expansions: usize,

    /// Seconds to wait, once expansion is done, for the result list to be ready
    #[arg(long, default_value_t = crate::search::expander::DEFAULT_SETTLE_TIMEOUT.as_secs())]
    pub settle_timeout_secs: u64,

    /// When a result URL repeats, keep the last element instead of the first
    #[arg(long)]
    pub keep_last_duplicate: bool,

    /// Skip checking that the page shows the requested date range
    #[arg(long)]
    pub no_verify: bool,
}
