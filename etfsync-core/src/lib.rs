//! etfsync core: EDGAR ETF universe sync.
//!
//! This crate contains the whole pipeline:
//! - Credential and run configuration
//! - EDGAR ticker source with retry/backoff and dual payload decoding
//! - Listing/title merge restricted to major US exchanges
//! - Name-based classification (fund filter, category, issuer, exchange)
//! - Batched merge-on-conflict upserts over the datastore's REST API
//! - Deterministic synthetic fund-flow rows
//! - Post-sync row count verification

pub mod classify;
pub mod config;
pub mod data;
pub mod flows;
pub mod pipeline;
pub mod rows;
pub mod store;
pub mod verify;

pub use classify::{Category, Classification, Classifier};
pub use config::{ConfigError, Credentials, SyncConfig};
pub use data::{EdgarClient, FetchError, PayloadError, TickerPayload, TickerRecord, TickerSource};
pub use flows::{generate_flows, FlowRow};
pub use pipeline::{run_sync, SyncError, SyncOptions, SyncReport};
pub use rows::EtfRow;
pub use store::{CountOutcome, PostgrestClient, StoreError, TableStore, UpsertSummary};
pub use verify::VerificationReport;
