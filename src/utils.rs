//! Utility functions for step timing, log formatting, and file system checks.
//!
//! - Step wrappers that time a unit of work and tag its error with the step name
//! - String truncation for logging page sources
//! - File system validation for the output directory

use crate::errors::RunError;
use std::error::Error;
use std::fs as stdfs;
use std::future::Future;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{error, info, instrument};

/// Split a duration into whole minutes, seconds and milliseconds.
pub fn split_elapsed(elapsed: Duration) -> (u64, u64, u32) {
    let secs = elapsed.as_secs();
    (secs / 60, secs % 60, elapsed.subsec_millis())
}

/// Render a duration as `{m}m:{s}s:{ms}ms`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let (m, s, ms) = split_elapsed(elapsed);
    format!("{m}m:{s}s:{ms}ms")
}

/// Run `f` as the named step.
///
/// Logs `Start: [step]` before and `End: [step] Execution time - …` after,
/// whether or not `f` succeeds. An error is logged once here and returned as
/// [`RunError::Step`].
pub fn timed_step<T, E, F>(step: &'static str, f: F) -> Result<T, RunError>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    info!("Start: [{step}]");
    let start = Instant::now();
    let result = f();
    finish_step(step, start, result)
}

/// Async twin of [`timed_step`].
pub async fn timed_step_async<T, E, Fut>(step: &'static str, fut: Fut) -> Result<T, RunError>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<Box<dyn Error + Send + Sync>>,
{
    info!("Start: [{step}]");
    let start = Instant::now();
    let result = fut.await;
    finish_step(step, start, result)
}

fn finish_step<T, E>(
    step: &'static str,
    start: Instant,
    result: Result<T, E>,
) -> Result<T, RunError>
where
    E: Into<Box<dyn Error + Send + Sync>>,
{
    info!("End: [{step}] Execution time - {}", format_elapsed(start.elapsed()));
    result.map_err(|e| {
        let source = e.into();
        error!(step, error = %source, "Step failed");
        RunError::Step { step, source }
    })
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with
/// `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and immediately
/// deletes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(path).await?;
    // Sync probe through std fs keeps the error surface simple
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
