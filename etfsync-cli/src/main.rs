//! etfsync CLI: pull every US-listed ETF from SEC EDGAR into the datastore.
//!
//! With no arguments it runs the full sync:
//! - fetch the EDGAR exchange listing and company titles
//! - classify ETF candidates and upsert them into `etfs`
//! - seed `fund_flows` with eight weeks of estimated rows
//! - report row counts for both tables
//!
//! Exits with status 1 when credentials are missing, when EDGAR cannot be
//! fetched, or when any `etfs` batch failed.

use anyhow::{Context, Result};
use clap::Parser;
use etfsync_core::config::DEFAULT_ENV_FILE;
use etfsync_core::{
    run_sync, Classifier, ConfigError, EdgarClient, PostgrestClient, SyncConfig, SyncOptions, SyncReport,
    UpsertSummary,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "etfsync",
    about = "Sync the SEC EDGAR ETF universe into the hosted datastore"
)]
struct Cli {
    /// Credential file with NEXT_PUBLIC_SUPABASE_URL and SUPABASE_SERVICE_KEY.
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Rows per upsert batch.
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,

    /// Do not seed the fund_flows table.
    #[arg(long, default_value_t = false)]
    skip_flows: bool,

    /// Do not query row counts after the upserts.
    #[arg(long, default_value_t = false)]
    skip_verify: bool,

    /// Fetch and classify only; write nothing.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match SyncConfig::load(&cli.env_file)
        .and_then(|c| c.with_batch_size(cli.batch_size as usize))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            if matches!(e, ConfigError::MissingCredentials) {
                eprintln!(
                    "       Expected in {} or the process environment.",
                    cli.env_file.display()
                );
            }
            std::process::exit(1);
        }
    };

    println!("{}", "=".repeat(65));
    println!("  ETF Universe -> datastore sync");
    println!("{}", "=".repeat(65));
    println!("Using datastore: {}", config.credentials.supabase_url);
    println!("Key prefix:      {}...", config.credentials.key_prefix());

    let classifier = Classifier::new().context("compiling classification rules")?;
    let source = EdgarClient::from_config(&config)?;
    let store = PostgrestClient::from_config(&config)?;

    let options = SyncOptions {
        seed_flows: !cli.skip_flows,
        verify: !cli.skip_verify,
        dry_run: cli.dry_run,
        ..SyncOptions::from_config(&config)
    };

    let report = run_sync(&source, &store, &classifier, &options, chrono::Utc::now())?;
    print_summary(&report);

    if !report.succeeded() {
        eprintln!("WARNING: some etfs batches had errors, see output above");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_upsert(label: &str, summary: &UpsertSummary) {
    println!(
        "{label:<16}{} upserted in {} batches, {} errors",
        summary.rows_sent, summary.batches, summary.failed_batches
    );
    for failure in &summary.failures {
        println!("  batch {} ({} rows): {}", failure.batch, failure.rows, failure.error);
    }
}

fn print_summary(report: &SyncReport) {
    println!();
    println!("=== Sync Result ===");
    println!("Listed tickers: {}", report.listed);
    println!("ETF candidates: {}", report.candidates);
    println!("Rows built:     {}", report.rows);
    println!();
    println!("--- Categories ---");
    for (category, count) in &report.categories {
        println!("{:<16}{count}", category.label());
    }

    if report.dry_run {
        println!();
        println!("Dry run: nothing was written.");
    }

    if let Some(etfs) = &report.etfs {
        println!();
        println!("--- Upserts ---");
        print_upsert("etfs:", etfs);
        if let Some(flows) = &report.flows {
            print_upsert("fund_flows:", flows);
        }
    }

    if let Some(verification) = &report.verification {
        println!();
        println!("--- Verification ---");
        println!("etfs table:       {} rows", verification.etfs);
        println!("fund_flows table: {} rows", verification.fund_flows);
    }

    println!();
    println!("Completed in {:.1}s", report.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_uses_defaults() {
        let cli = Cli::try_parse_from(["etfsync"]).unwrap();
        assert_eq!(cli.env_file, PathBuf::from(DEFAULT_ENV_FILE));
        assert_eq!(cli.batch_size, 500);
        assert!(!cli.skip_flows && !cli.skip_verify && !cli.dry_run);
    }

    #[test]
    fn zero_batch_size_rejected() {
        assert!(Cli::try_parse_from(["etfsync", "--batch-size", "0"]).is_err());
    }
}
