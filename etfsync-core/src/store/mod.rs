//! Table store abstraction and the batched upsert loop.
//!
//! The TableStore trait hides the HTTP details of the hosted datastore so the
//! batching and failure accounting can be exercised against an in-memory
//! store. A failed batch is recorded and the loop moves on; partial success
//! is a normal outcome.

pub mod postgrest;

pub use postgrest::PostgrestClient;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Longest response body kept in an error, in characters.
pub const ERROR_BODY_LIMIT: usize = 500;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot build HTTP client: {0}")]
    Client(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("cannot serialize rows: {0}")]
    Serialize(String),
}

/// A remote table store with merge-on-conflict writes and exact counts.
pub trait TableStore {
    /// Human-readable name of this store.
    fn name(&self) -> &str;

    /// Insert or merge one batch of rows, keyed on `on_conflict`.
    fn upsert_batch(&self, table: &str, on_conflict: &str, rows: &[Value]) -> Result<(), StoreError>;

    /// Exact row count, or `None` when the store answered without one.
    fn count_rows(&self, table: &str, column: &str) -> Result<Option<u64>, StoreError>;
}

/// A batch that could not be written.
#[derive(Debug)]
pub struct BatchFailure {
    /// 1-based batch number.
    pub batch: usize,
    pub rows: usize,
    pub error: StoreError,
}

/// Outcome of upserting a row set.
#[derive(Debug, Default)]
pub struct UpsertSummary {
    pub table: String,
    pub batches: usize,
    pub rows_sent: usize,
    pub failed_batches: usize,
    pub failures: Vec<BatchFailure>,
}

impl UpsertSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed_batches == 0
    }
}

/// Partition `rows` into consecutive batches of at most `batch_size` and
/// upsert each one. A `batch_size` of zero is treated as one.
pub fn upsert_rows<T: Serialize>(
    store: &dyn TableStore,
    table: &str,
    on_conflict: &str,
    rows: &[T],
    batch_size: usize,
) -> UpsertSummary {
    let batch_size = batch_size.max(1);
    let mut summary = UpsertSummary {
        table: table.to_string(),
        ..Default::default()
    };

    info!(
        table,
        store = store.name(),
        rows = rows.len(),
        batch_size,
        "upserting rows"
    );

    for (i, batch) in rows.chunks(batch_size).enumerate() {
        summary.batches += 1;
        let result = to_values(batch).and_then(|values| store.upsert_batch(table, on_conflict, &values));

        match result {
            Ok(()) => {
                summary.rows_sent += batch.len();
                info!(table, batch = i + 1, rows = batch.len(), "batch upserted");
            }
            Err(error) => {
                warn!(table, batch = i + 1, rows = batch.len(), %error, "batch failed");
                summary.failed_batches += 1;
                summary.failures.push(BatchFailure {
                    batch: i + 1,
                    rows: batch.len(),
                    error,
                });
            }
        }
    }

    info!(
        table,
        rows_sent = summary.rows_sent,
        failed_batches = summary.failed_batches,
        "upsert finished"
    );
    summary
}

fn to_values<T: Serialize>(batch: &[T]) -> Result<Vec<Value>, StoreError> {
    batch
        .iter()
        .map(|row| serde_json::to_value(row).map_err(|e| StoreError::Serialize(e.to_string())))
        .collect()
}

/// Result of a best-effort count query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    Exact(u64),
    /// The store answered but did not report a total.
    Unknown,
    Failed(String),
}

impl fmt::Display for CountOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountOutcome::Exact(n) => write!(f, "{n}"),
            CountOutcome::Unknown => f.write_str("?"),
            CountOutcome::Failed(reason) => write!(f, "error: {reason}"),
        }
    }
}

/// Total from a `Content-Range` header such as `0-0/3421`.
///
/// Returns `None` for `*` totals or malformed values.
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    if total.is_empty() || !total.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    total.parse().ok()
}

/// Truncate a response body for error reporting.
pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
