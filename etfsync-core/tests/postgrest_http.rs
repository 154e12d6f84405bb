//! PostgREST client against a local mock server.

use etfsync_core::store::{upsert_rows, CountOutcome, PostgrestClient, StoreError, TableStore};
use etfsync_core::verify::count_table;
use etfsync_core::Credentials;
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

const KEY: &str = "service-role-test-key";

fn client(server: &MockServer) -> PostgrestClient {
    let credentials = Credentials {
        supabase_url: server.base_url(),
        api_key: KEY.to_string(),
    };
    PostgrestClient::new(&credentials, Duration::from_secs(5), Duration::from_secs(5)).unwrap()
}

fn ticker_rows(n: usize) -> Vec<serde_json::Value> {
    (0..n).map(|i| json!({"ticker": format!("T{i:04}")})).collect()
}

#[test]
fn upsert_sends_auth_conflict_key_and_prefer() {
    let server = MockServer::start();
    let upsert = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/etfs")
            .query_param("on_conflict", "ticker")
            .header("apikey", KEY)
            .header("authorization", format!("Bearer {KEY}"))
            .header("prefer", "resolution=merge-duplicates,return=minimal")
            .json_body(json!([{"ticker": "SPY"}]));
        then.status(201);
    });

    client(&server)
        .upsert_batch("etfs", "ticker", &[json!({"ticker": "SPY"})])
        .unwrap();
    upsert.assert();
}

#[test]
fn rows_are_sent_in_batches() {
    let server = MockServer::start();
    let upsert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/etfs");
        then.status(201);
    });

    let summary = upsert_rows(&client(&server), "etfs", "ticker", &ticker_rows(1200), 500);

    upsert.assert_calls(3);
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.rows_sent, 1200);
    assert!(summary.all_succeeded());
}

#[test]
fn rejected_batches_are_counted_with_truncated_body() {
    let server = MockServer::start();
    let long_body = "x".repeat(2000);
    let upsert = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/fund_flows");
        then.status(409).body(&long_body);
    });

    let summary = upsert_rows(
        &client(&server),
        "fund_flows",
        "category,week_ending",
        &ticker_rows(3),
        2,
    );

    upsert.assert_calls(2);
    assert_eq!(summary.failed_batches, 2);
    assert_eq!(summary.rows_sent, 0);
    match &summary.failures[0].error {
        StoreError::Status { status, body } => {
            assert_eq!(*status, 409);
            assert_eq!(body.len(), 500);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn count_reads_content_range_total() {
    let server = MockServer::start();
    let count = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/etfs")
            .query_param("select", "ticker")
            .header("prefer", "count=exact")
            .header("range", "0-0");
        then.status(206)
            .header("content-range", "0-0/3421")
            .json_body(json!([{"ticker": "SPY"}]));
    });

    assert_eq!(
        count_table(&client(&server), "etfs", "ticker"),
        CountOutcome::Exact(3421)
    );
    count.assert();
}

#[test]
fn count_without_total_is_unknown() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/fund_flows");
        then.status(200).header("content-range", "0-0/*").json_body(json!([]));
    });

    assert_eq!(
        client(&server).count_rows("fund_flows", "category").unwrap(),
        None
    );
}

#[test]
fn count_failure_is_reported_inline() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/etfs");
        then.status(401).body("invalid api key");
    });

    let outcome = count_table(&client(&server), "etfs", "ticker");
    assert_eq!(
        outcome,
        CountOutcome::Failed("HTTP 401: invalid api key".into())
    );
}
