//! Classifying image references and naming local copies.

use std::path::{Path, PathBuf};

use url::Url;

/// Fallback extension when a URL path has none.
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Whether a reference is written like a filesystem path.
pub fn looks_like_path(reference: &str) -> bool {
    reference.starts_with("./") || reference.starts_with("../") || reference.contains('/') || reference.contains('\\')
}

/// The http(s) URL a reference points at, if it resolves to one with a network host.
///
/// Absolute http(s) references stand on their own; relative ones are joined
/// against `base` when the base is itself an http(s) URL.
pub fn network_url(reference: &str, base: Option<&str>) -> Option<Url> {
    if let Ok(url) = Url::parse(reference) {
        return is_network(&url).then_some(url);
    }
    let base = Url::parse(base?).ok().filter(is_network)?;
    base.join(reference).ok().filter(is_network)
}

fn is_network(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}

/// Local candidates for a path-like reference, in lookup order: as given,
/// relative to the working directory, relative to its parent, and relative to
/// `base_dir` (the directory of the local HTML file) when there is one.
pub fn local_candidates(reference: &str, base_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(reference)];

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(reference));
        if let Some(parent) = cwd.parent() {
            candidates.push(parent.join(reference));
        }
    }

    if let Some(dir) = base_dir {
        candidates.push(dir.join(reference));
    }

    candidates
}

/// File name for a downloaded image.
///
/// Uses the last segment of the URL path (query excluded). Names shorter than
/// three characters are replaced by `image_<token><ext>`.
pub fn file_name_for(url: &Url) -> String {
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    if name.chars().count() < 3 {
        let token = uuid::Uuid::new_v4().simple().to_string();
        format!("image_{}{}", &token[..8], guess_extension(url))
    } else {
        name.to_string()
    }
}

/// Extension (with dot) of the URL path, or `.jpg`.
pub fn guess_extension(url: &Url) -> String {
    Path::new(url.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
