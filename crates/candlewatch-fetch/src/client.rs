//! HTTP client for the exchange kline endpoint.

use async_trait::async_trait;
use candlewatch_types::Candle;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::parse::{ParseError, parse_klines};
use crate::url::{BASE_URL, klines_url};
use crate::{KlineFeed, KlineRequest};

/// Configuration for the kline client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (no trailing path).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// Idle connections kept per host.
    pub pool_size: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
            pool_size: 4,
            user_agent: format!("candlewatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Errors that can occur while fetching klines.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server kept returning an error status after all retries.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// Request was rejected (4xx other than rate limiting).
    #[error("Request rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, usually an exchange error object.
        body: String,
    },

    /// Payload could not be decoded into candles.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Kline client with connection pooling and retry logic.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    client: Client,
    config: ClientConfig,
}

impl BinanceClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the raw kline payload for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails after all retries or the
    /// exchange rejects it.
    pub async fn fetch_raw(&self, request: &KlineRequest) -> Result<Vec<u8>, FetchError> {
        let url = klines_url(&self.config.base_url, request);
        let mut attempts = 0;

        loop {
            match self.client.get(&url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_server_error()
                        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.calculate_backoff_delay(attempts);
                            tracing::debug!(
                                symbol = %request.symbol,
                                status = status.as_u16(),
                                attempt = attempts,
                                delay_ms = delay.as_millis() as u64,
                                "retrying kline request"
                            );
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(FetchError::ServerError {
                            status: status.as_u16(),
                        });
                    }

                    if status.is_client_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(FetchError::Rejected {
                            status: status.as_u16(),
                            body,
                        });
                    }

                    return Ok(response.bytes().await?.to_vec());
                }
                Err(e) if Self::is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.calculate_backoff_delay(attempts);
                    tracing::debug!(
                        symbol = %request.symbol,
                        error = %e,
                        attempt = attempts,
                        "retrying kline request after transport error"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));
        let capped = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter in [-25%, +25%) keyed on the attempt number.
        let jitter_range = capped / 4;
        let jitter = if jitter_range > 0 {
            let offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            offset as i64 - jitter_range as i64
        } else {
            0
        };

        Duration::from_millis((capped as i64 + jitter).max(100) as u64)
    }

    fn is_retryable_error(error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect() || error.is_request()
    }
}

#[async_trait]
impl KlineFeed for BinanceClient {
    async fn fetch_klines(&self, request: &KlineRequest) -> Result<Vec<Candle>, FetchError> {
        let body = self.fetch_raw(request).await?;
        let mut candles = parse_klines(&body)?;
        candles.sort_by_key(|c| c.open_time);
        Ok(candles)
    }
}
