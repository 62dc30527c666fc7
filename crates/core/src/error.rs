//! Unified error types for lessonkit.
//!
//! Only I/O-layer failures surface here; extraction of parseable HTML never fails.

/// Unified error types for lessonkit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a content selector that does not parse).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Local source file could not be read.
    #[error("READ_FAILED: {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be written.
    #[error("WRITE_FAILED: {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Result could not be serialized.
    #[error("SERIALIZE_FAILED: {0}")]
    SerializeFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidUrl("missing scheme".to_string());
        assert!(err.to_string().contains("INVALID_URL"));
        assert!(err.to_string().contains("missing scheme"));
    }

    #[test]
    fn test_read_failed_display() {
        let err = Error::ReadFailed {
            path: "page.html".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "READ_FAILED: page.html: no such file");
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.to_string().starts_with("SERIALIZE_FAILED"));
    }
}
