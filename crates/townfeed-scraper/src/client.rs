use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, REFERER};
use reqwest::{Client, StatusCode, Url};
use townfeed_core::AppConfig;

use crate::error::ScraperError;
use crate::retry::RetryPolicy;

/// A fetched HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub html: String,
}

/// Retrieves a page by URL.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send;
}

/// HTTP fetcher that presents itself as a desktop browser.
///
/// Municipal sites commonly reject non-browser user agents, so every request
/// carries a browser `User-Agent`, `Accept` headers and a same-origin
/// `Referer`. Transient failures are retried per the injected [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        retry: RetryPolicy,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .default_headers(browser_headers())
            .build()?;
        Ok(Self { client, retry })
    }

    /// Builds a fetcher from the `TOWNFEED_FETCH_*` settings.
    ///
    /// # Errors
    ///
    /// See [`HttpFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.fetch_timeout_secs,
            &config.fetch_user_agent,
            RetryPolicy::new(
                config.fetch_max_attempts,
                Duration::from_millis(config.fetch_backoff_ms),
            ),
        )
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-CA,en;q=0.9"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

impl Fetch for HttpFetcher {
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse.
    /// - [`ScraperError::NotFound`] on HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ScraperError::Http`] on network failure after all attempts.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let target = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let referer = format!("{}/", target.origin().ascii_serialization());

        self.retry
            .run(|| {
                let target = target.clone();
                let referer = referer.clone();
                async move {
                    let response = self
                        .client
                        .get(target.clone())
                        .header(REFERER, referer)
                        .send()
                        .await?;
                    let status = response.status();

                    if status == StatusCode::NOT_FOUND {
                        return Err(ScraperError::NotFound {
                            url: target.to_string(),
                        });
                    }
                    if !status.is_success() {
                        return Err(ScraperError::UnexpectedStatus {
                            status: status.as_u16(),
                            url: target.to_string(),
                        });
                    }

                    let html = response.text().await?;
                    tracing::debug!(url = %target, bytes = html.len(), "fetched page");
                    Ok(FetchedPage {
                        url: target.to_string(),
                        status: status.as_u16(),
                        html,
                    })
                }
            })
            .await
    }
}
