//! Where a page comes from, and loading its HTML.

use std::path::PathBuf;

use lessonkit_core::Error;

use super::FetchClient;

/// A page to extract: a local HTML file or a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

/// HTML of a loaded page and the context image references resolve against.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub html: String,
    /// Path of the local file, or the final URL after redirects.
    pub base_context: String,
}

/// Load the HTML for `source`.
///
/// Files are read from disk; URLs are fetched with `client`. Both are decoded
/// as UTF-8 with invalid sequences replaced.
pub async fn load_source(source: &Source, client: &FetchClient) -> Result<LoadedPage, Error> {
    match source {
        Source::File(path) => {
            tracing::info!(path = %path.display(), "reading HTML file");
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| Error::ReadFailed { path: path.display().to_string(), source })?;
            tracing::info!(bytes = bytes.len(), "read HTML file");
            Ok(LoadedPage {
                html: String::from_utf8_lossy(&bytes).into_owned(),
                base_context: path.display().to_string(),
            })
        }
        Source::Url(url) => {
            let response = client.fetch(url).await?;
            tracing::info!(bytes = response.bytes.len(), ms = response.fetch_ms, "fetched page");
            Ok(LoadedPage { html: response.text(), base_context: response.final_url.to_string() })
        }
    }
}
