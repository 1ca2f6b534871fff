use std::time::Duration;

use crate::config::Config;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The target answered with a non-2xx status; the body was not read.
    #[error("HTTP {0}")]
    Status(u16),
    /// DNS, TLS, connect, timeout or body-read failure.
    #[error("{0}")]
    Network(String),
}

// ── Page fetcher ─────────────────────────────────────────────────────────────

/// Time-bounded GET of arbitrary pages with the service's bot identity.
///
/// Cheaply cloneable; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("text/html,application/xhtml+xml"),
        );

        let mut builder = reqwest::ClientBuilder::new()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);

        if config.insecure_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.fetch_timeout,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetch `url` and return its body as text.
    ///
    /// Reading stops at the configured byte limit; the head of a page, where
    /// the OG tags live, is kept and the rest is dropped.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.describe(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.describe(e))? {
            let room = self.max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                tracing::debug!(%url, limit = self.max_body_bytes, "page body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn describe(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Network(format!(
                "TimeoutError: request aborted after {}ms",
                self.timeout.as_millis()
            ))
        } else if e.is_connect() {
            FetchError::Network(format!("ConnectError: {}", e))
        } else {
            FetchError::Network(format!("RequestError: {}", e))
        }
    }
}
