//! Join the exchange listing with the title map.

use super::payload::TickerPayload;
use super::source::PayloadError;
use std::collections::{HashMap, HashSet};

/// EDGAR exchange codes kept by the merger. Everything else (OTC, blank) is dropped.
pub const VALID_EXCHANGES: [&str; 5] = ["Nasdaq", "NYSE", "NYSE MKT", "NYSE Arca", "CBOE"];

/// Width EDGAR uses for zero-padded CIKs.
const CIK_WIDTH: usize = 10;

/// An exchange-listed ticker with its best-effort title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerRecord {
    pub ticker: String,
    /// Empty when the title map has no entry for the ticker.
    pub title: String,
    /// EDGAR exchange code, one of [`VALID_EXCHANGES`].
    pub exchange: String,
    /// Zero-padded to ten characters.
    pub cik: String,
}

pub fn is_valid_exchange(code: &str) -> bool {
    VALID_EXCHANGES.contains(&code)
}

/// Left-pad a CIK with zeros to ten characters.
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>width$}", cik, width = CIK_WIDTH)
}

/// Build the title lookup. Later entries overwrite earlier ones.
pub fn title_map(titles: &TickerPayload) -> Result<HashMap<String, String>, PayloadError> {
    Ok(titles
        .title_entries()?
        .into_iter()
        .map(|entry| (entry.ticker, entry.title))
        .collect())
}

/// Merge the two datasets into records for allow-listed exchanges.
///
/// Listing order is preserved. A ticker listed more than once is kept at its
/// first occurrence.
pub fn merge_listings(
    listing: &TickerPayload,
    titles: &TickerPayload,
) -> Result<Vec<TickerRecord>, PayloadError> {
    let titles = title_map(titles)?;
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut duplicates = 0usize;

    for entry in listing.listing_entries()? {
        if entry.ticker.is_empty() || !is_valid_exchange(&entry.exchange) {
            continue;
        }
        if !seen.insert(entry.ticker.clone()) {
            duplicates += 1;
            continue;
        }

        let title = titles.get(&entry.ticker).cloned().unwrap_or_default();
        records.push(TickerRecord {
            cik: pad_cik(&entry.cik),
            title,
            exchange: entry.exchange,
            ticker: entry.ticker,
        });
    }

    if duplicates > 0 {
        tracing::debug!(duplicates, "dropped repeated tickers from exchange listing");
    }
    tracing::info!(
        titles = titles.len(),
        listed = records.len(),
        "merged EDGAR listing with company titles"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> TickerPayload {
        TickerPayload::from_value(json!({
            "fields": ["cik", "name", "ticker", "exchange"],
            "data": [
                [1064642, "SPDR S&P 500", "spy", "NYSE Arca"],
                [1100663, "iShares Gold", "IAU", "NYSE Arca"],
                [999, "Pink Sheet Co", "PINK", "OTC"],
                [123, "No Exchange", "NOEX", null],
                [1064642, "SPDR dup", "SPY", "NYSE"]
            ]
        }))
        .unwrap()
    }

    fn titles() -> TickerPayload {
        TickerPayload::from_value(json!({
            "0": {"cik_str": 1064642, "ticker": "SPY", "title": "SPDR S&P 500 ETF TRUST"},
            "1": {"cik_str": 999, "ticker": "PINK", "title": "Pink Sheet ETF"}
        }))
        .unwrap()
    }

    #[test]
    fn excludes_exchanges_outside_allow_set() {
        let records = merge_listings(&listing(), &titles()).unwrap();
        let tickers: Vec<_> = records.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["SPY", "IAU"]);
        assert!(records.iter().all(|r| is_valid_exchange(&r.exchange)));
    }

    #[test]
    fn missing_title_is_empty() {
        let records = merge_listings(&listing(), &titles()).unwrap();
        let iau = records.iter().find(|r| r.ticker == "IAU").unwrap();
        assert_eq!(iau.title, "");
    }

    #[test]
    fn cik_is_zero_padded() {
        let records = merge_listings(&listing(), &titles()).unwrap();
        assert_eq!(records[0].cik, "0001064642");
        assert_eq!(pad_cik(""), "0000000000");
        assert_eq!(pad_cik("12345678901"), "12345678901");
    }

    #[test]
    fn first_listing_of_a_ticker_wins() {
        let records = merge_listings(&listing(), &titles()).unwrap();
        let spy: Vec<_> = records.iter().filter(|r| r.ticker == "SPY").collect();
        assert_eq!(spy.len(), 1);
        assert_eq!(spy[0].exchange, "NYSE Arca");
    }

    #[test]
    fn later_titles_overwrite_earlier() {
        let titles = TickerPayload::from_value(json!({
            "fields": ["ticker", "title"],
            "data": [["SPY", "old"], ["spy", "new"]]
        }))
        .unwrap();
        assert_eq!(title_map(&titles).unwrap()["SPY"], "new");
    }

    #[test]
    fn both_shapes_merge_identically() {
        let keyed_listing = TickerPayload::from_value(json!({
            "0": {"cik_str": 1064642, "ticker": "spy", "exchange": "NYSE Arca"},
            "1": {"cik_str": 1100663, "ticker": "IAU", "exchange": "NYSE Arca"},
            "2": {"cik_str": 999, "ticker": "PINK", "exchange": "OTC"}
        }))
        .unwrap();
        let tabular_titles = TickerPayload::from_value(json!({
            "fields": ["cik_str", "ticker", "title"],
            "data": [
                [1064642, "SPY", "SPDR S&P 500 ETF TRUST"],
                [999, "PINK", "Pink Sheet ETF"]
            ]
        }))
        .unwrap();

        assert_eq!(
            merge_listings(&listing(), &titles()).unwrap(),
            merge_listings(&keyed_listing, &tabular_titles).unwrap()
        );
    }
}
