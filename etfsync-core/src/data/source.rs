//! Ticker source trait and fetch error types.
//!
//! The TickerSource trait abstracts over where the two EDGAR datasets come
//! from, so the pipeline can run against the live endpoint or an in-memory
//! fixture in tests.

use super::payload::TickerPayload;
use thiserror::Error;

/// Errors from fetching or decoding a remote dataset.
///
/// Any of these aborts the run once retries are exhausted.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot build HTTP client: {0}")]
    Client(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("unexpected payload shape: {0}")]
    Payload(#[from] PayloadError),

    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

/// Errors from normalizing a decoded payload into records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("tabular payload has no '{0}' column")]
    MissingField(String),

    #[error("payload is neither a field/row table nor an object map")]
    UnknownShape,
}

/// A source for the two datasets the merger joins.
pub trait TickerSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Ticker → exchange listing (with CIK).
    fn exchange_listing(&self) -> Result<TickerPayload, FetchError>;

    /// Ticker → company title.
    fn company_titles(&self) -> Result<TickerPayload, FetchError>;
}
