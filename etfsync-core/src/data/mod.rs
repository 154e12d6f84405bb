//! EDGAR ticker data: fetching, payload decoding and merging.

pub mod edgar;
pub mod merge;
pub mod payload;
pub mod source;

pub use edgar::EdgarClient;
pub use merge::{merge_listings, TickerRecord, VALID_EXCHANGES};
pub use payload::TickerPayload;
pub use source::{FetchError, PayloadError, TickerSource};
