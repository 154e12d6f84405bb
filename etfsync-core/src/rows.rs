//! `etfs` table rows built from classified ticker records.

use crate::classify::{display_exchange, Category, Classifier};
use crate::data::TickerRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ETFS_TABLE: &str = "etfs";
pub const ETFS_CONFLICT_KEY: &str = "ticker";

/// `updated_at` format: UTC, second precision, `Z` suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One row of the `etfs` table, keyed on `ticker`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtfRow {
    pub ticker: String,
    pub name: String,
    pub issuer: String,
    pub category: Category,
    pub sub_category: String,
    pub exchange: String,
    pub cik: String,
    pub updated_at: String,
}

/// Keep only records whose title looks like an ETF.
pub fn filter_candidates(records: Vec<TickerRecord>, classifier: &Classifier) -> Vec<TickerRecord> {
    let total = records.len();
    let candidates: Vec<_> = records
        .into_iter()
        .filter(|r| classifier.is_etf_candidate(&r.title))
        .collect();
    tracing::info!(
        listed = total,
        candidates = candidates.len(),
        "filtered to ETF candidates"
    );
    candidates
}

/// Build upsert rows. Every row shares the same `updated_at`.
pub fn build_rows(
    candidates: &[TickerRecord],
    classifier: &Classifier,
    now: DateTime<Utc>,
) -> Vec<EtfRow> {
    let updated_at = now.format(TIMESTAMP_FORMAT).to_string();

    candidates
        .iter()
        .map(|record| {
            let c = classifier.classify(&record.title);
            let name = if record.title.is_empty() {
                record.ticker.clone()
            } else {
                record.title.clone()
            };
            EtfRow {
                ticker: record.ticker.clone(),
                name,
                issuer: c.issuer.to_string(),
                category: c.category,
                sub_category: c.sub_category.to_string(),
                exchange: display_exchange("", &record.exchange),
                cik: record.cik.clone(),
                updated_at: updated_at.clone(),
            }
        })
        .collect()
}

/// Row count per category, for run summaries.
pub fn category_breakdown(rows: &[EtfRow]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.category).or_insert(0) += 1;
    }
    counts
}
