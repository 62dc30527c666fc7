//! Validation of page URLs given on the command line.

/// Error type for URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme `{0}`, please include http:// or https://")]
    UnsupportedScheme(String),

    #[error("missing host, please include http:// or https://")]
    MissingHost,

    #[error("invalid URL ({0}), please include http:// or https://")]
    InvalidUrl(String),
}

/// Validate a page URL.
///
/// The input is trimmed and must parse as an absolute `http`/`https` URL with
/// a host. No scheme is assumed when one is missing.
pub fn validate_url(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(parsed)
}
