//! Page loading from the network or the local filesystem.
//!
//! ### URL validation
//! - Trim whitespace, require an `http`/`https` scheme and a host
//!
//! ### HTTP fetch
//! - Browser-like User-Agent and `Accept: text/html...`
//! - Max redirects: 5
//! - Timeout: 30s (configurable)
//! - Max body bytes: 5MB (configurable)
//! - Bodies are decoded as UTF-8, replacing invalid sequences

pub mod source;
pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

use lessonkit_core::{AppConfig, Error};

pub use source::{LoadedPage, Source, load_source};
pub use url::{UrlError, validate_url};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 30s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.page_timeout(),
            max_redirects: 5,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// HTTP client for course pages.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a page, returning raw bytes and metadata.
    ///
    /// Respects the redirect and byte limits; any non-2xx status is an error.
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = validate_url(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        tracing::info!(url = %url, "fetching page");

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, ACCEPT_HTML)
            .send()
            .await
            .map_err(|e| request_error("request failed", &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpError(format!("status {} for {}", status.as_u16(), url)));
        }

        if let Some(length) = response.content_length().filter(|&len| len > self.config.max_bytes as u64) {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", length, self.config.max_bytes)));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| request_error("failed to read response", &e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, bytes.len());

        Ok(FetchResponse { url, final_url, status, content_type, bytes, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn request_error(context: &str, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{}: {}", context, err))
    } else {
        Error::HttpError(format!("{}: {}", context, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned responses, one per accepted connection, and return the base URL.
    async fn serve(responses: Vec<String>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for response in responses {
                let Ok((mut socket, _)) = listener.accept().await else { return };
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    fn response(status_line: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "{status_line}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\n{extra_headers}Connection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_fetch_response_text_is_lossy() {
        let response = FetchResponse {
            url: Url::parse("https://example.com").unwrap(),
            final_url: Url::parse("https://example.com/redirected").unwrap(),
            status: StatusCode::OK,
            content_type: Some("text/html".to_string()),
            bytes: Bytes::from_static(b"<p>caf\xe9</p>"),
            fetch_ms: 100,
        };

        assert_eq!(response.final_url.as_str(), "https://example.com/redirected");
        assert_eq!(response.text(), "<p>caf\u{FFFD}</p>");
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        assert!(FetchClient::new(FetchConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = serve(vec![response("HTTP/1.1 200 OK", "", "<h1>Lesson</h1>")]).await;
        let client = FetchClient::new(FetchConfig::default()).unwrap();

        let fetched = client.fetch(&format!("{base}/lesson")).await.unwrap();

        assert_eq!(fetched.status, StatusCode::OK);
        assert_eq!(fetched.text(), "<h1>Lesson</h1>");
        assert_eq!(fetched.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(fetched.final_url.as_str(), format!("{base}/lesson"));
    }

    #[tokio::test]
    async fn test_fetch_follows_redirect() {
        let base = serve(vec![
            response("HTTP/1.1 302 Found", "Location: /moved\r\n", ""),
            response("HTTP/1.1 200 OK", "", "<p>moved</p>"),
        ])
        .await;
        let client = FetchClient::new(FetchConfig::default()).unwrap();

        let fetched = client.fetch(&format!("{base}/start")).await.unwrap();

        assert_eq!(fetched.url.as_str(), format!("{base}/start"));
        assert_eq!(fetched.final_url.as_str(), format!("{base}/moved"));
        assert_eq!(fetched.text(), "<p>moved</p>");
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let base = serve(vec![response("HTTP/1.1 404 Not Found", "", "nope")]).await;
        let client = FetchClient::new(FetchConfig::default()).unwrap();

        let err = client.fetch(&format!("{base}/missing")).await.unwrap_err();

        assert!(matches!(err, Error::HttpError(ref msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let base = serve(vec![response("HTTP/1.1 200 OK", "", &"x".repeat(64))]).await;
        let config = FetchConfig { max_bytes: 16, ..Default::default() };
        let client = FetchClient::new(config).unwrap();

        let err = client.fetch(&base).await.unwrap_err();

        assert!(matches!(err, Error::FetchTooLarge(_)));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                tokio::time::sleep(Duration::from_secs(2)).await;
                drop(socket);
            }
        });
        let config = FetchConfig { timeout: Duration::from_millis(200), ..Default::default() };
        let client = FetchClient::new(config).unwrap();

        let err = client.fetch(&format!("http://{addr}/slow")).await.unwrap_err();

        assert!(matches!(err, Error::FetchTimeout(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_url() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let err = client.fetch("example.com/page").await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
