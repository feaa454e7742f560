//! # News Search Harvest
//!
//! Collects every article a news-site search returns for a phrase over the
//! last few months and writes them out as a spreadsheet, a JSON file and a
//! folder of pictures.
//!
//! ## Usage
//!
//! ```sh
//! news_search_harvest --search-phrase climate --section Climate --months 2
//! ```
//!
//! ## Architecture
//!
//! The run is a fixed sequence of timed steps:
//! 1. **Configuration**: fold the work item and CLI into a [`config::RunConfig`]
//! 2. **Page**: fetch the results page (or read a saved one) into a DOM
//! 3. **Filters**: select categories and sections, confirm the date range
//! 4. **Collection**: expand, deduplicate and extract the results
//! 5. **Output**: spreadsheet, JSON and pictures (pictures 5 at a time)

use chrono::Local;
use clap::Parser;
use reqwest::Client;
use std::convert::Infallible;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod cli;
mod config;
mod dates;
mod dom;
mod errors;
mod models;
mod outputs;
mod search;
mod selectors;
mod text;
mod utils;

use cli::Cli;
use config::RunConfig;
use dates::DateRange;
use dom::html::HtmlPage;
use dom::DomAccessor;
use errors::FilterError;
use models::ArticleRow;
use outputs::{excel, json, pictures};
use search::expander::PaginationExpander;
use search::filters::{apply_filter, verify_date_range, FilterKind, RetryPolicy};
use search::pipeline::ResultSetPipeline;
use search::query::search_url;
use selectors::RESULTS;
use utils::{ensure_writable_dir, format_elapsed, timed_step, timed_step_async, truncate_for_log};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("news_search_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = timed_step("Load Configuration", || RunConfig::resolve(&args))?;

    // Early check: fail before any network work if outputs can't be written
    if let Err(e) = ensure_writable_dir(&config.output_dir).await {
        error!(
            path = %config.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let range = DateRange::past_months(config.months, Local::now().date_naive());
    let url = timed_step("Build Search URL", || search_url(&config.search_phrase, &range))?;
    info!(%url, %range, "Searching");

    let client = Client::builder().user_agent(USER_AGENT).build()?;
    let mut page = timed_step_async("Open Search Page", load_page(&client, &config, &url)).await?;

    timed_step("Set Filters", || apply_filters(&mut page, &config))?;

    if config.verify_date_range {
        timed_step("Set Date Range", || {
            verify_date_range(&mut page, &range, RetryPolicy::default())
        })?;
    } else {
        info!("Skipping date range verification");
    }

    let expander = PaginationExpander::new(&RESULTS)
        .with_max_expansions(config.max_expansions)
        .with_settle_timeout(config.settle_timeout);
    let pipeline = ResultSetPipeline::new(&RESULTS)
        .with_expander(expander)
        .with_policy(config.dedup_policy);
    let articles = timed_step("Get Articles", || {
        pipeline.collect(&mut page, &config.search_phrase)
    })?;

    if articles.is_empty() {
        info!(search_phrase = %config.search_phrase, %range, "No articles found");
        return Ok(());
    }
    info!(count = articles.len(), "Collected articles");

    let now = Local::now().naive_local();
    let rows: Vec<ArticleRow> = articles.iter().map(|a| a.to_row(now)).collect();

    let xlsx_path = config.output_dir.join(excel::FILE_NAME);
    timed_step("Export Excel", || excel::export_articles(&rows, &xlsx_path))?;
    timed_step_async("Export JSON", json::write_articles(&rows, &config.output_dir)).await?;

    let images_dir = config.images_dir();
    let summary = timed_step_async("Download Pictures", async {
        Ok::<_, Infallible>(pictures::download_pictures(&client, &articles, &images_dir).await)
    })
    .await?;
    if summary.failed > 0 {
        warn!(failed = summary.failed, "Some pictures could not be downloaded");
    }

    let elapsed = start_time.elapsed();
    info!(
        elapsed = %format_elapsed(elapsed),
        articles = rows.len(),
        pictures = summary.downloaded,
        "Execution complete"
    );

    Ok(())
}

/// Fetch the results page, or read it from `--html`, into a DOM snapshot.
///
/// A saved page is still addressed by `url` so relative links and the
/// date-range check resolve against the search that produced it.
#[instrument(level = "info", skip_all, fields(%url))]
async fn load_page(
    client: &Client,
    config: &RunConfig,
    url: &Url,
) -> Result<HtmlPage, Box<dyn Error + Send + Sync>> {
    let source = match &config.html {
        Some(path) => {
            info!(path = %path.display(), "Reading saved results page");
            tokio::fs::read_to_string(path).await?
        }
        None => {
            client
                .get(url.as_str())
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?
        }
    };

    let page = HtmlPage::new(url.as_str(), source);
    debug!(
        location = %page.location(),
        preview = %truncate_for_log(page.source(), 300),
        "Loaded results page"
    );
    Ok(page)
}

/// Apply the configured category and section filters.
///
/// Empty lists are skipped. Any failure aborts the run: a page that cannot
/// be driven (a snapshot cannot click) fails here rather than returning
/// unfiltered results.
fn apply_filters<D: DomAccessor>(dom: &mut D, config: &RunConfig) -> Result<(), FilterError> {
    let requested = [
        (FilterKind::Type, &config.categories),
        (FilterKind::Section, &config.sections),
    ];
    for (kind, items) in requested {
        if items.is_empty() {
            info!(kind = kind.as_str(), "No filters requested");
            continue;
        }
        let outcome = apply_filter(dom, kind, items)?;
        debug!(kind = kind.as_str(), ?outcome, "Filter outcome");
    }
    Ok(())
}
