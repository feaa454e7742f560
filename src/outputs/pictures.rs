//! Picture downloads.
//!
//! Downloads are plain HTTP fetches keyed by each article's image URL, so
//! unlike page extraction they run concurrently, at most
//! [`DOWNLOAD_CONCURRENCY`] at a time. A failed download is logged and
//! counted; it never stops the others.

use crate::errors::DownloadError;
use crate::models::Article;
use crate::text::filename_from_url;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

pub const DOWNLOAD_CONCURRENCY: usize = 5;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub failed: usize,
    /// Articles without a picture.
    pub skipped: usize,
}

/// Download the picture of every article that has one into `dir`.
///
/// # Arguments
///
/// * `client` - HTTP client shared by all downloads
/// * `articles` - Articles whose `image_url` is fetched when present
/// * `dir` - Target directory, created if missing
///
/// # Returns
///
/// A [`DownloadSummary`]. Individual failures are counted there and logged,
/// so this never fails as a whole.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), articles = articles.len()))]
pub async fn download_pictures(
    client: &Client,
    articles: &[Article],
    dir: &Path,
) -> DownloadSummary {
    let mut summary = DownloadSummary::default();

    let urls: Vec<&str> = articles
        .iter()
        .filter_map(|article| {
            if article.image_url().is_none() {
                debug!(title = %article.title(), "No picture found");
            }
            article.image_url()
        })
        .collect();
    summary.skipped = articles.len() - urls.len();

    let results: Vec<Result<PathBuf, DownloadError>> = stream::iter(urls)
        .map(|url| async move {
            let result = download_picture(client, url, dir).await;
            if let Err(e) = &result {
                warn!(%url, error = %e, "Picture download failed");
            }
            result
        })
        .buffer_unordered(DOWNLOAD_CONCURRENCY)
        .collect()
        .await;

    for result in results {
        match result {
            Ok(_) => summary.downloaded += 1,
            Err(_) => summary.failed += 1,
        }
    }

    info!(
        downloaded = summary.downloaded,
        failed = summary.failed,
        skipped = summary.skipped,
        "Finished picture downloads"
    );
    summary
}

/// Fetch `url` into `dir`, named after the URL's last path segment.
///
/// An existing file with the same name is overwritten.
#[instrument(level = "debug", skip(client, dir))]
pub async fn download_picture(
    client: &Client,
    url: &str,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let filename =
        filename_from_url(Some(url)).ok_or_else(|| DownloadError::NoFileName(url.to_string()))?;

    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    fs::write(&path, &bytes).await?;
    debug!(path = %path.display(), bytes = bytes.len(), "Saved picture");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, image_url: Option<String>) -> Article {
        Article::new("x", "May 14", title, None, image_url)
    }

    #[tokio::test]
    async fn test_failures_do_not_block_other_downloads() {
        let mut server = mockito::Server::new_async().await;
        let found = server
            .mock("GET", "/images/a.jpg")
            .with_status(200)
            .with_body("jpeg-a")
            .create_async()
            .await;
        let gone = server
            .mock("GET", "/images/gone.jpg")
            .with_status(404)
            .create_async()
            .await;

        let articles = vec![
            article("A", Some(format!("{}/images/a.jpg", server.url()))),
            article("Gone", Some(format!("{}/images/gone.jpg", server.url()))),
            article("No picture", None),
        ];
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");

        let summary = download_pictures(&Client::new(), &articles, &images).await;

        assert_eq!(
            summary,
            DownloadSummary {
                downloaded: 1,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(std::fs::read(images.join("a.jpg")).unwrap(), b"jpeg-a");
        assert!(!images.join("gone.jpg").exists());
        found.assert_async().await;
        gone.assert_async().await;
    }

    #[tokio::test]
    async fn test_existing_file_is_overwritten() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/img/photo.png")
            .with_status(200)
            .with_body("fresh")
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.png"), "stale").unwrap();

        let url = format!("{}/img/photo.png", server.url());
        let path = download_picture(&Client::new(), &url, dir.path()).await.unwrap();

        assert_eq!(path, dir.path().join("photo.png"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_url_without_file_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = download_picture(&Client::new(), "https://example.com/", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::NoFileName(_)));
    }
}
