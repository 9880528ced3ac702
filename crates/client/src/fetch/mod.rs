//! HTTP fetch for the script-source endpoint.
//!
//! ### Behavior
//! - Plain GET with a configured User-Agent and timeout
//! - Anything other than `200 OK` is an error
//! - Max redirects: 5
//! - Max body bytes: 1MB (the payload is a short JSON array)

pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use url::{UrlError, parse_http_url};

use adunblock_core::Error;
use adunblock_core::config::AppConfig;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "adunblock/<version>")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 1MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Whether HTTP(S)_PROXY environment variables apply (default: true)
    pub use_env_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("adunblock/", env!("CARGO_PKG_VERSION")).to_string(),
            max_bytes: 1024 * 1024,
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
            use_env_proxy: true,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout(), ..Default::default() }
    }
}

/// HTTP fetch client.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true);

        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }

        let http = builder
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// GET a URL and return the body of a `200 OK` response.
    pub async fn fetch(&self, url: &Url) -> Result<Bytes, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(format!("{} after {:?}", url, self.config.timeout))
                } else {
                    Error::HttpError(format!("network error: {}", e))
                }
            })?;

        let status = response.status();

        if status != StatusCode::OK {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::HttpError(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::HttpError(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, start.elapsed().as_millis(), bytes.len());

        Ok(bytes)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CannedServer;

    fn local_client() -> FetchClient {
        FetchClient::new(FetchConfig { use_env_proxy: false, ..Default::default() }).unwrap()
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert!(config.user_agent.starts_with("adunblock/"));
        assert_eq!(config.max_bytes, 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.max_redirects, 5);
        assert!(config.use_env_proxy);
    }

    #[test]
    fn test_fetch_config_from_app_config() {
        let app = AppConfig { user_agent: "probe/1".into(), timeout_ms: 2_500, ..Default::default() };
        let config = FetchConfig::from(&app);
        assert_eq!(config.user_agent, "probe/1");
        assert_eq!(config.timeout, Duration::from_millis(2_500));
        assert_eq!(config.max_redirects, 5);
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let server = CannedServer::start(200, r#"["https://cdn.example/s1.js"]"#).await;
        let body = local_client().fetch(&server.url()).await.unwrap();

        assert_eq!(&body[..], br#"["https://cdn.example/s1.js"]"#);
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_error() {
        let server = CannedServer::start(500, "oops").await;
        let result = local_client().fetch(&server.url()).await;
        assert!(matches!(result, Err(Error::HttpError(msg)) if msg.contains("500")));

        let server = CannedServer::start(204, "").await;
        let result = local_client().fetch(&server.url()).await;
        assert!(matches!(result, Err(Error::HttpError(_))));
    }

    #[tokio::test]
    async fn test_fetch_too_large() {
        let server = CannedServer::start(200, "[\"https://cdn.example/a-rather-long-script-name.js\"]").await;
        let client = FetchClient::new(FetchConfig { max_bytes: 8, use_env_proxy: false, ..Default::default() }).unwrap();
        let result = client.fetch(&server.url()).await;
        assert!(matches!(result, Err(Error::HttpError(msg)) if msg.contains("exceeds")));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let url = Url::parse("http://127.0.0.1:9/valid_script_sources.json").unwrap();
        let result = local_client().fetch(&url).await;
        assert!(result.is_err());
    }
}
