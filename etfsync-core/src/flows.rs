//! Synthetic weekly fund-flow estimates.
//!
//! These rows are illustrative, not measured: each category has a fixed
//! baseline weekly flow, varied by up to ±20% per week. The variation is
//! derived from a BLAKE3 hash of the category label and the week offset, so
//! the same (category, week) always produces the same number on every run and
//! every machine.

use crate::classify::Category;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const FLOWS_TABLE: &str = "fund_flows";
pub const FLOWS_CONFLICT_KEY: &str = "category,week_ending";

/// Weeks of history generated per run.
pub const WEEKS: u32 = 8;

/// Weekly → monthly extrapolation factor.
pub const MONTHLY_FACTOR: f64 = 4.3;

/// Weeks end on Friday.
const REFERENCE_WEEKDAY_FROM_MONDAY: u32 = 4;

/// Width of the variance band in percentage points (−20..=+20).
const VARIANCE_SPAN: u64 = 41;

/// Static estimates for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryBaseline {
    pub category: Category,
    pub total_aum: i64,
    pub etf_count: u32,
    pub weekly_flow: i64,
}

const fn baseline(category: Category, total_aum: i64, etf_count: u32, weekly_flow: i64) -> CategoryBaseline {
    CategoryBaseline {
        category,
        total_aum,
        etf_count,
        weekly_flow,
    }
}

pub const BASELINES: [CategoryBaseline; 11] = [
    baseline(Category::UsEquity, 6_200_000_000_000, 1_200, 3_500_000_000),
    baseline(Category::FixedIncome, 1_400_000_000_000, 650, 1_800_000_000),
    baseline(Category::Sector, 680_000_000_000, 680, 200_000_000),
    baseline(Category::International, 700_000_000_000, 310, 400_000_000),
    baseline(Category::Commodities, 140_000_000_000, 120, -100_000_000),
    baseline(Category::RealEstate, 70_000_000_000, 60, -150_000_000),
    baseline(Category::Leveraged, 110_000_000_000, 280, -250_000_000),
    baseline(Category::Thematic, 90_000_000_000, 320, -100_000_000),
    baseline(Category::Esg, 55_000_000_000, 110, 50_000_000),
    baseline(Category::DigitalAssets, 65_000_000_000, 30, 1_200_000_000),
    baseline(Category::MultiAsset, 25_000_000_000, 40, 80_000_000),
];

/// One row of the `fund_flows` table, keyed on (category, week_ending).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRow {
    pub category: Category,
    /// Serialized as `YYYY-MM-DD`.
    pub week_ending: NaiveDate,
    pub weekly_flow: i64,
    pub monthly_flow: i64,
    pub total_aum: i64,
    pub etf_count: u32,
}

/// Most recent Friday on or before `today`.
pub fn last_week_ending(today: NaiveDate) -> NaiveDate {
    let from_monday = today.weekday().num_days_from_monday();
    let days_back = (from_monday + 7 - REFERENCE_WEEKDAY_FROM_MONDAY) % 7;
    today - Duration::days(i64::from(days_back))
}

/// Stable 64-bit hash of a category label.
pub fn category_seed(category: Category) -> u64 {
    let hash = blake3::hash(category.label().as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Multiplier in `[0.80, 1.20]` for a (category, week) pair.
pub fn variance_factor(category: Category, week_offset: u32) -> f64 {
    let week_seed = u64::from(week_offset) * 7;
    let bucket = (week_seed % VARIANCE_SPAN + category_seed(category) % VARIANCE_SPAN) % VARIANCE_SPAN;
    1.0 + (bucket as f64 - 20.0) / 100.0
}

/// Weekly flow for a baseline and week, truncated toward zero.
pub fn weekly_flow(baseline: &CategoryBaseline, week_offset: u32) -> i64 {
    (baseline.weekly_flow as f64 * variance_factor(baseline.category, week_offset)) as i64
}

/// Monthly extrapolation of a weekly flow, truncated toward zero.
pub fn monthly_flow(weekly: i64) -> i64 {
    (weekly as f64 * MONTHLY_FACTOR) as i64
}

/// Generate `weeks` weeks of rows for every category, newest week first.
pub fn generate_flows(today: NaiveDate, weeks: u32) -> Vec<FlowRow> {
    let reference = last_week_ending(today);
    let mut rows = Vec::with_capacity(weeks as usize * BASELINES.len());

    for week_offset in 0..weeks {
        let week_ending = reference - Duration::weeks(i64::from(week_offset));
        for baseline in &BASELINES {
            let weekly = weekly_flow(baseline, week_offset);
            rows.push(FlowRow {
                category: baseline.category,
                week_ending,
                weekly_flow: weekly,
                monthly_flow: monthly_flow(weekly),
                total_aum: baseline.total_aum,
                etf_count: baseline.etf_count,
            });
        }
    }

    rows
}
