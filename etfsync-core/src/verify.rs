//! Post-sync row counts. Best effort: failures are reported, never raised.

use crate::flows::FLOWS_TABLE;
use crate::rows::ETFS_TABLE;
use crate::store::{CountOutcome, TableStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub etfs: CountOutcome,
    pub fund_flows: CountOutcome,
}

/// Count one table through the store.
pub fn count_table(store: &dyn TableStore, table: &str, column: &str) -> CountOutcome {
    match store.count_rows(table, column) {
        Ok(Some(n)) => CountOutcome::Exact(n),
        Ok(None) => CountOutcome::Unknown,
        Err(e) => {
            tracing::warn!(table, error = %e, "count query failed");
            CountOutcome::Failed(e.to_string())
        }
    }
}

pub fn verify(store: &dyn TableStore) -> VerificationReport {
    VerificationReport {
        etfs: count_table(store, ETFS_TABLE, "ticker"),
        fund_flows: count_table(store, FLOWS_TABLE, "category"),
    }
}
