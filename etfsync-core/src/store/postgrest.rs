//! PostgREST-style REST client for the hosted datastore.
//!
//! Upserts are POSTs to `/rest/v1/{table}?on_conflict={key}` with
//! `Prefer: resolution=merge-duplicates,return=minimal`. Counts are GETs with
//! `Prefer: count=exact` and `Range: 0-0`, read back from `Content-Range`.

use super::{parse_content_range, truncate_body, StoreError, TableStore};
use crate::config::{Credentials, SyncConfig};
use reqwest::blocking::{RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

pub const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";
pub const COUNT_PREFER: &str = "count=exact";

pub struct PostgrestClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    count_timeout: Duration,
}

impl PostgrestClient {
    pub fn new(
        credentials: &Credentials,
        timeout: Duration,
        count_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: credentials.supabase_url.trim_end_matches('/').to_string(),
            api_key: credentials.api_key.clone(),
            count_timeout,
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, StoreError> {
        Self::new(&config.credentials, config.http_timeout, config.count_timeout)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Turn a non-2xx response into a [`StoreError::Status`].
fn check_status(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body: truncate_body(&body),
    })
}

impl TableStore for PostgrestClient {
    fn name(&self) -> &str {
        "postgrest"
    }

    fn upsert_batch(&self, table: &str, on_conflict: &str, rows: &[Value]) -> Result<(), StoreError> {
        let resp = self
            .authorized(self.client.post(self.table_url(table)))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", UPSERT_PREFER)
            .json(rows)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        check_status(resp).map(|_| ())
    }

    fn count_rows(&self, table: &str, column: &str) -> Result<Option<u64>, StoreError> {
        let resp = self
            .authorized(self.client.get(self.table_url(table)))
            .query(&[("select", column)])
            .header("Prefer", COUNT_PREFER)
            .header("Range", "0-0")
            .timeout(self.count_timeout)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let resp = check_status(resp)?;
        Ok(resp
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range))
    }
}
