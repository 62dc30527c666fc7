//! Image resolution: locating, copying, and downloading referenced images.
//!
//! ### Local references
//! - Path-like references (`./`, `../`, or containing a separator) that do not
//!   resolve to a network URL are looked up in a fixed list of local candidates
//!   and copied into the output directory under their base file name.
//!
//! ### Network references
//! - Relative references are joined against an http(s) base context.
//! - The body is streamed to a temporary file in the output directory with a
//!   bounded timeout and byte cap, then renamed to `output_dir/<file name>`.
//!   A failed download never touches a file already saved under that name.
//!
//! Every failure is logged and recorded as a missing local path; resolution
//! never aborts extraction. Images are processed one at a time in document order.

pub mod naming;

use std::path::{Path, PathBuf};
use std::time::Duration;

use lessonkit_core::{AppConfig, Error, ExtractionResult};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use url::Url;

pub use naming::{file_name_for, guess_extension, local_candidates, looks_like_path, network_url};

/// Options for image resolution.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Whether to copy/download at all (default: false)
    pub download: bool,

    /// Directory receiving local copies (default: "images")
    pub output_dir: PathBuf,

    /// Per-image download timeout (default: 10s)
    pub timeout: Duration,

    /// User agent string for image requests
    pub user_agent: String,

    /// Maximum image body size in bytes (default: 5MB)
    pub max_bytes: usize,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ImageOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            download: config.download_images,
            output_dir: config.image_dir.clone(),
            timeout: config.image_timeout(),
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
        }
    }
}

/// Outcome of resolving one image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Absolute location the reference resolved to (URL or file path), or the reference itself.
    pub resolved_ref: String,
    /// Path of the local copy, when one was made.
    pub local_path: Option<PathBuf>,
}

impl ResolvedImage {
    fn unresolved(reference: &str) -> Self {
        Self { resolved_ref: reference.to_string(), local_path: None }
    }
}

/// Resolves image references relative to one page's base context.
pub struct ImageResolver {
    http: Client,
    options: ImageOptions,
    base: Option<String>,
}

impl ImageResolver {
    /// Create a resolver for a page whose base context is `base`
    /// (its URL, or the path of the local HTML file).
    pub fn new(options: ImageOptions, base: Option<String>) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&options.user_agent)
            .timeout(options.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, options, base })
    }

    /// Resolve one reference. Never fails; a missing copy is `local_path: None`.
    pub async fn resolve(&self, reference: &str) -> ResolvedImage {
        if !self.options.download || reference.is_empty() {
            return ResolvedImage::unresolved(reference);
        }

        if let Err(e) = tokio::fs::create_dir_all(&self.options.output_dir).await {
            tracing::warn!(dir = %self.options.output_dir.display(), "failed to create image directory: {e}");
            return ResolvedImage::unresolved(reference);
        }

        let base = self.base.as_deref();
        if let Some(url) = network_url(reference, base) {
            return self.download(url).await;
        }

        if looks_like_path(reference) {
            return self.copy_local(reference).await;
        }

        tracing::warn!(src = %reference, "image reference is neither a local path nor a network URL");
        ResolvedImage::unresolved(reference)
    }

    /// Resolve every image of a result in document order, filling in `local_path`.
    pub async fn resolve_images(&self, mut result: ExtractionResult) -> ExtractionResult {
        if !self.options.download {
            return result;
        }
        for image in result.images_mut() {
            tracing::debug!(src = %image.src, alt = %image.alt, "processing image");
            let resolved = self.resolve(&image.src).await;
            match &resolved.local_path {
                Some(path) => tracing::info!(
                    src = %image.src,
                    resolved = %resolved.resolved_ref,
                    path = %path.display(),
                    "saved image"
                ),
                None => tracing::warn!(src = %image.src, resolved = %resolved.resolved_ref, "failed to save image"),
            }
            image.local_path = resolved.local_path.map(|p| p.to_string_lossy().into_owned());
        }
        result
    }

    /// Directory of the base context when it is an existing local file.
    async fn base_dir(&self) -> Option<PathBuf> {
        let base = Path::new(self.base.as_deref()?);
        if !tokio::fs::metadata(base).await.is_ok_and(|meta| meta.is_file()) {
            return None;
        }
        let base = std::path::absolute(base).unwrap_or_else(|_| base.to_path_buf());
        base.parent().map(Path::to_path_buf)
    }

    async fn copy_local(&self, reference: &str) -> ResolvedImage {
        let base_dir = self.base_dir().await;
        let candidates = local_candidates(reference, base_dir.as_deref());
        let Some(source) = first_file(&candidates).await else {
            tracing::warn!(src = %reference, tried = candidates.len(), "local image not found in any candidate path");
            return ResolvedImage::unresolved(reference);
        };

        let Some(file_name) = source.file_name() else {
            return ResolvedImage::unresolved(reference);
        };
        let destination = self.options.output_dir.join(file_name);
        let resolved_ref = source.to_string_lossy().into_owned();

        if same_file(source, &destination).await {
            return ResolvedImage { resolved_ref, local_path: Some(destination) };
        }

        match tokio::fs::copy(source, &destination).await {
            Ok(_) => {
                tracing::info!(from = %source.display(), to = %destination.display(), "copied local image");
                ResolvedImage { resolved_ref, local_path: Some(destination) }
            }
            Err(e) => {
                tracing::warn!(from = %source.display(), "failed to copy local image: {e}");
                ResolvedImage { resolved_ref, local_path: None }
            }
        }
    }

    async fn download(&self, url: Url) -> ResolvedImage {
        let destination = self.options.output_dir.join(file_name_for(&url));
        let resolved_ref = url.to_string();

        match self.fetch_to(&url, &destination).await {
            Ok(bytes) => {
                tracing::info!(url = %url, path = %destination.display(), bytes, "downloaded image");
                ResolvedImage { resolved_ref, local_path: Some(destination) }
            }
            Err(e) => {
                tracing::warn!(url = %url, "failed to download image: {e}");
                ResolvedImage { resolved_ref, local_path: None }
            }
        }
    }

    /// Download `url` into `destination`, returning the byte count.
    ///
    /// The body goes to a temporary sibling first and only replaces
    /// `destination` once it is complete.
    async fn fetch_to(&self, url: &Url, destination: &Path) -> Result<u64, Error> {
        let mut response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| network_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        let limit = self.options.max_bytes as u64;
        if let Some(length) = response.content_length().filter(|&len| len > limit) {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", length, limit)));
        }

        let partial = partial_path(destination);
        let result = async {
            let write_error = |source| Error::WriteFailed { path: partial.display().to_string(), source };
            let mut file = tokio::fs::File::create(&partial).await.map_err(write_error)?;

            let mut written = 0u64;
            while let Some(chunk) = response.chunk().await.map_err(|e| network_error(&e))? {
                written += chunk.len() as u64;
                if written > limit {
                    return Err(Error::FetchTooLarge(format!("body exceeds {} bytes", limit)));
                }
                file.write_all(&chunk).await.map_err(write_error)?;
            }
            file.flush().await.map_err(write_error)?;
            drop(file);

            tokio::fs::rename(&partial, destination)
                .await
                .map_err(|source| Error::WriteFailed { path: destination.display().to_string(), source })?;
            Ok::<u64, Error>(written)
        }
        .await;

        if result.is_err() {
            let _ = tokio::fs::remove_file(&partial).await;
        }
        result
    }
}

fn network_error(err: &reqwest::Error) -> Error {
    if err.is_timeout() { Error::FetchTimeout(err.to_string()) } else { Error::HttpError(err.to_string()) }
}

/// First candidate that is an existing regular file.
async fn first_file(candidates: &[PathBuf]) -> Option<&PathBuf> {
    for path in candidates {
        tracing::debug!(path = %path.display(), "trying local image path");
        if tokio::fs::metadata(path).await.is_ok_and(|meta| meta.is_file()) {
            return Some(path);
        }
    }
    None
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Hidden sibling of `destination` that receives an in-progress download.
fn partial_path(destination: &Path) -> PathBuf {
    let name = destination.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let token = uuid::Uuid::new_v4().simple().to_string();
    destination.with_file_name(format!(".{}.{}.part", name, &token[..8]))
}
