//! Decoding of the two EDGAR payload shapes.
//!
//! EDGAR has published its ticker files both as a field/row table
//! (`{"fields": [...], "data": [[...], ...]}`) and as an object keyed by row
//! number (`{"0": {...}, "1": {...}}`). Both decode into [`TickerPayload`]
//! and are normalized into the same entry types before anything downstream
//! sees them.

use super::source::PayloadError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One of the two upstream JSON shapes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TickerPayload {
    /// Column names plus positional rows.
    Tabular {
        fields: Vec<String>,
        data: Vec<Vec<Value>>,
    },
    /// Object of objects, in document order.
    Keyed(Map<String, Value>),
}

/// A row of the ticker → exchange listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Uppercased ticker; empty when the source row had none.
    pub ticker: String,
    /// CIK as published (not yet padded).
    pub cik: String,
    pub exchange: String,
}

/// A row of the ticker → title map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub ticker: String,
    pub title: String,
}

/// Accepted column names for each logical field, first name preferred.
const TICKER: &[&str] = &["ticker"];
const CIK: &[&str] = &["cik_str", "cik"];
const EXCHANGE: &[&str] = &["exchange"];
const TITLE: &[&str] = &["title"];

impl TickerPayload {
    /// Decode an already parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        serde_json::from_value(value).map_err(|_| PayloadError::UnknownShape)
    }

    /// Normalize into listing entries.
    pub fn listing_entries(&self) -> Result<Vec<ListingEntry>, PayloadError> {
        Ok(self
            .columns(&[TICKER, CIK, EXCHANGE])?
            .into_iter()
            .map(|mut cols| {
                let exchange = cols.pop().unwrap_or_default();
                let cik = cols.pop().unwrap_or_default();
                let ticker = cols.pop().unwrap_or_default();
                ListingEntry {
                    ticker: ticker.trim().to_uppercase(),
                    cik,
                    exchange,
                }
            })
            .collect())
    }

    /// Normalize into title entries, dropping rows without a ticker.
    pub fn title_entries(&self) -> Result<Vec<TitleEntry>, PayloadError> {
        Ok(self
            .columns(&[TICKER, TITLE])?
            .into_iter()
            .filter_map(|mut cols| {
                let title = cols.pop().unwrap_or_default();
                let ticker = cols.pop().unwrap_or_default().trim().to_uppercase();
                (!ticker.is_empty()).then_some(TitleEntry { ticker, title })
            })
            .collect())
    }

    /// Number of rows (or keyed entries) in the payload.
    pub fn len(&self) -> usize {
        match self {
            TickerPayload::Tabular { data, .. } => data.len(),
            TickerPayload::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Project every row onto the requested columns, as text.
    ///
    /// An empty table yields no rows even if its field list is incomplete.
    fn columns(&self, wanted: &[&[&str]]) -> Result<Vec<Vec<String>>, PayloadError> {
        match self {
            TickerPayload::Tabular { fields, data } => {
                if fields.is_empty() || data.is_empty() {
                    return Ok(Vec::new());
                }
                let indices = wanted
                    .iter()
                    .map(|aliases| {
                        aliases
                            .iter()
                            .find_map(|alias| fields.iter().position(|f| f == alias))
                            .ok_or_else(|| PayloadError::MissingField(aliases[0].to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(data
                    .iter()
                    .map(|row| {
                        indices
                            .iter()
                            .map(|&i| row.get(i).map(scalar_text).unwrap_or_default())
                            .collect()
                    })
                    .collect())
            }
            TickerPayload::Keyed(map) => Ok(map
                .values()
                .filter_map(Value::as_object)
                .map(|entry| {
                    wanted
                        .iter()
                        .map(|aliases| {
                            aliases
                                .iter()
                                .find_map(|alias| entry.get(*alias))
                                .map(scalar_text)
                                .unwrap_or_default()
                        })
                        .collect()
                })
                .collect()),
        }
    }
}

/// Render a JSON scalar the way it reads in the document; null is empty.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
