//! JSON export of the article rows.
//!
//! Mirrors the spreadsheet: the same rows with the same column names, written
//! as one pretty-printed array to `{output_dir}/articles.json`.

use crate::errors::ExportError;
use crate::models::ArticleRow;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

pub const FILE_NAME: &str = "articles.json";

/// Write `rows` as JSON into `output_dir`, creating the directory if needed.
///
/// Returns the path of the written file.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_articles(
    rows: &[ArticleRow],
    output_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(rows)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = output_dir.join(FILE_NAME);
    info!(path = %path.display(), "Writing JSON");
    fs::write(&path, json).await?;
    info!(path = %path.display(), count = rows.len(), "Wrote JSON file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Article;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_write_articles_round_trips_rows() {
        let now = NaiveDate::from_ymd_opt(2023, 5, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let rows = vec![Article::new("rain", "May 14", "Rain again", None, None).to_row(now)];
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("output");

        let path = write_articles(&rows, &nested).await.unwrap();

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("\"Picture Filename\": \"No picture found\""));
        let parsed: Vec<ArticleRow> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, rows);
    }
}
