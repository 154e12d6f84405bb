//! SEC EDGAR ticker file source.
//!
//! Fetches the exchange listing and the company title map from EDGAR's
//! public `files/` endpoint. Every request is retried with exponential
//! backoff; the last error is returned once attempts run out.

use super::payload::TickerPayload;
use super::source::{FetchError, TickerSource};
use crate::config::SyncConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const EXCHANGE_LISTING_URL: &str = "https://www.sec.gov/files/company_tickers_exchange.json";
pub const COMPANY_TITLES_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Blocking EDGAR client.
pub struct EdgarClient {
    client: reqwest::blocking::Client,
    exchange_url: String,
    titles_url: String,
    max_attempts: u32,
    base_delay: Duration,
}

impl EdgarClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            exchange_url: EXCHANGE_LISTING_URL.to_string(),
            titles_url: COMPANY_TITLES_URL.to_string(),
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, FetchError> {
        Self::new(&config.user_agent, config.http_timeout)
    }

    /// Point the client at different dataset URLs.
    pub fn with_endpoints(mut self, exchange_url: &str, titles_url: &str) -> Self {
        self.exchange_url = exchange_url.to_string();
        self.titles_url = titles_url.to_string();
        self
    }

    /// Change the attempt budget and the first backoff delay.
    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_delay = base_delay;
        self
    }

    /// GET a URL and parse the body as JSON, with retry.
    ///
    /// The delay before attempt `n` (1-based, n > 1) is `base_delay * 2^(n-2)`.
    pub fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let mut last_error = None;

        for attempt in 0..self.max_attempts {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(url, ?delay, "backing off before retry");
                std::thread::sleep(delay);
            }

            match self.get_json_once(url) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(url, attempt = attempt + 1, error = %e, "EDGAR request failed");
                    last_error = Some(e);
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
            last: Box::new(
                last_error.unwrap_or_else(|| FetchError::NetworkUnreachable("no attempt made".into())),
            ),
        })
    }

    fn get_json_once(&self, url: &str) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| FetchError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.json::<Value>()
            .map_err(|e| FetchError::InvalidJson(e.to_string()))
    }

    fn fetch_payload(&self, url: &str) -> Result<TickerPayload, FetchError> {
        let value = self.get_json(url)?;
        let payload = TickerPayload::from_value(value)?;
        info!(url, rows = payload.len(), "fetched EDGAR dataset");
        Ok(payload)
    }
}

impl TickerSource for EdgarClient {
    fn name(&self) -> &str {
        "sec_edgar"
    }

    fn exchange_listing(&self) -> Result<TickerPayload, FetchError> {
        self.fetch_payload(&self.exchange_url)
    }

    fn company_titles(&self) -> Result<TickerPayload, FetchError> {
        self.fetch_payload(&self.titles_url)
    }
}
