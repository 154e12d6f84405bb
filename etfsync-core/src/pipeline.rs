//! End-to-end sync: fetch → merge → classify → upsert → seed flows → verify.
//!
//! Fetch and decode failures abort the run. Upsert batch failures are
//! collected in the report; only failures on the `etfs` table make the run
//! unsuccessful.

use crate::classify::{Category, Classifier};
use crate::config::{SyncConfig, DEFAULT_BATCH_SIZE};
use crate::data::{merge_listings, FetchError, PayloadError, TickerSource};
use crate::flows::{generate_flows, FLOWS_CONFLICT_KEY, FLOWS_TABLE, WEEKS};
use crate::rows::{build_rows, category_breakdown, filter_candidates, ETFS_CONFLICT_KEY, ETFS_TABLE};
use crate::store::{upsert_rows, TableStore, UpsertSummary};
use crate::verify::{verify, VerificationReport};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("cannot decode EDGAR payload: {0}")]
    Payload(#[from] PayloadError),
}

/// Knobs for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub batch_size: usize,
    pub seed_flows: bool,
    pub verify: bool,
    /// Fetch and classify only; write nothing and skip verification.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            seed_flows: true,
            verify: true,
            dry_run: false,
        }
    }
}

impl SyncOptions {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            ..Default::default()
        }
    }
}

/// What a run did.
#[derive(Debug)]
pub struct SyncReport {
    /// Exchange-listed tickers after merging.
    pub listed: usize,
    /// Tickers whose title passed the ETF filter.
    pub candidates: usize,
    /// Rows built for the `etfs` table.
    pub rows: usize,
    pub categories: BTreeMap<Category, usize>,
    /// `None` in dry-run mode.
    pub etfs: Option<UpsertSummary>,
    /// Rows generated for `fund_flows` (zero when skipped).
    pub flow_rows: usize,
    /// `None` when flow seeding was skipped or in dry-run mode.
    pub flows: Option<UpsertSummary>,
    pub verification: Option<VerificationReport>,
    pub dry_run: bool,
    pub elapsed: Duration,
}

impl SyncReport {
    /// True unless the `etfs` upsert lost a batch. Flow and verification
    /// problems never fail a run.
    pub fn succeeded(&self) -> bool {
        self.etfs.as_ref().map_or(true, UpsertSummary::all_succeeded)
    }
}

pub fn run_sync(
    source: &dyn TickerSource,
    store: &dyn TableStore,
    classifier: &Classifier,
    options: &SyncOptions,
    now: DateTime<Utc>,
) -> Result<SyncReport, SyncError> {
    let started = Instant::now();

    info!(source = source.name(), "[1/4] fetching exchange listing and company titles");
    let listing = source.exchange_listing()?;
    let titles = source.company_titles()?;
    let records = merge_listings(&listing, &titles)?;
    let listed = records.len();

    info!("[2/4] filtering to ETF candidates");
    let candidates = filter_candidates(records, classifier);

    info!("[3/4] building rows");
    let rows = build_rows(&candidates, classifier, now);
    let categories = category_breakdown(&rows);

    let mut report = SyncReport {
        listed,
        candidates: candidates.len(),
        rows: rows.len(),
        categories,
        etfs: None,
        flow_rows: 0,
        flows: None,
        verification: None,
        dry_run: options.dry_run,
        elapsed: Duration::ZERO,
    };

    if options.dry_run {
        info!(rows = rows.len(), "dry run: skipping writes and verification");
        report.elapsed = started.elapsed();
        return Ok(report);
    }

    info!(rows = rows.len(), batch_size = options.batch_size, "[4/4] upserting ETFs");
    report.etfs = Some(upsert_rows(
        store,
        ETFS_TABLE,
        ETFS_CONFLICT_KEY,
        &rows,
        options.batch_size,
    ));

    if options.seed_flows {
        let flows = generate_flows(now.date_naive(), WEEKS);
        info!(rows = flows.len(), weeks = WEEKS, "seeding estimated fund flows");
        report.flow_rows = flows.len();
        report.flows = Some(upsert_rows(
            store,
            FLOWS_TABLE,
            FLOWS_CONFLICT_KEY,
            &flows,
            options.batch_size,
        ));
    }

    if options.verify {
        report.verification = Some(verify(store));
    }

    report.elapsed = started.elapsed();
    Ok(report)
}
