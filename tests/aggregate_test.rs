//! Integration tests for building the ReportContext from raw records.

mod common;

use common::*;
use firefly_report::error::ReportError;
use firefly_report::models::category::UNCATEGORIZED;
use firefly_report::services::aggregate::{build_report, RawReportData};

fn build(raw: RawReportData) -> firefly_report::models::ReportContext {
    build_report(period(), "EUR", "€", raw).expect("report should build")
}

/// Categories sort descending by magnitude with zeros trailing.
#[test]
fn test_category_order_by_magnitude_with_zero_block() {
    let mut raw = report_data(vec![
        withdrawal("2026-07-03", "100.00", "Groceries"),
        deposit("2026-07-01", "500.00", "Salary", "Employer"),
        withdrawal("2026-07-10", "0.00", "Transport"),
    ]);
    raw.categories = vec![raw_category("1", "Transport")];

    let context = build(raw);
    let names: Vec<&str> = context.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Salary", "Groceries", "Transport"]);
    assert_eq!(context.categories[0].total_cents, 50000);
    assert_eq!(context.categories[1].total_cents, -10000);
    assert_eq!(context.categories[2].total_cents, 0);
}

/// Zero-valued categories keep their roster order at the end of the list.
#[test]
fn test_zero_categories_keep_relative_order() {
    let mut raw = report_data(vec![withdrawal("2026-07-03", "50.00", "Rent")]);
    raw.categories = vec![
        raw_category("1", "Clothing"),
        raw_category("2", "Hobbies"),
        raw_category("3", "Travel"),
    ];

    let context = build(raw);
    let names: Vec<&str> = context.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Rent", "Clothing", "Hobbies", "Travel"]);
}

/// Equal magnitudes keep first-seen order.
#[test]
fn test_tied_magnitudes_keep_first_seen_order() {
    let context = build(report_data(vec![
        withdrawal("2026-07-01", "25.00", "Coffee"),
        withdrawal("2026-07-02", "25.00", "Tea"),
        deposit("2026-07-03", "25.00", "Refunds", "Shop"),
    ]));
    let names: Vec<&str> = context.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Coffee", "Tea", "Refunds"]);
}

/// The uncategorized bucket exists exactly when uncategorized
/// transactions do.
#[test]
fn test_uncategorized_bucket_only_when_present() {
    let with_bucket = build(report_data(vec![
        withdrawal("2026-07-03", "10.00", "Groceries"),
        raw_tx("withdrawal", "2026-07-04", "5.00"),
    ]));
    assert!(
        with_bucket.categories.iter().any(|c| c.name == UNCATEGORIZED),
        "uncategorized spend should get its own bucket"
    );

    let without_bucket = build(report_data(vec![withdrawal(
        "2026-07-03",
        "10.00",
        "Groceries",
    )]));
    assert!(
        !without_bucket.categories.iter().any(|c| c.name == UNCATEGORIZED),
        "no bucket without uncategorized transactions"
    );
}

/// Transfers move money between own accounts; they touch neither
/// category totals nor net figures.
#[test]
fn test_transfers_are_excluded() {
    let context = build(report_data(vec![
        withdrawal("2026-07-03", "10.00", "Groceries"),
        raw_tx("transfer", "2026-07-04", "999.00"),
    ]));
    assert_eq!(context.categories.len(), 1);
    assert_eq!(context.month.spent_cents, 1000);
    assert_eq!(context.month.earned_cents, 0);
}

/// Monthly figures come from the report month, yearly figures from the
/// whole stream; both from the same fetch.
#[test]
fn test_monthly_and_yearly_nets() {
    let context = build(report_data(vec![
        deposit("2026-03-01", "1000.00", "Salary", "Employer"),
        withdrawal("2026-03-10", "400.00", "Rent"),
        deposit("2026-07-01", "1000.00", "Salary", "Employer"),
        withdrawal("2026-07-10", "250.00", "Rent"),
    ]));

    assert_eq!(context.month.earned_cents, 100000);
    assert_eq!(context.month.spent_cents, 25000);
    assert_eq!(context.month.net_cents(), 75000);

    assert_eq!(context.year.earned_cents, 200000);
    assert_eq!(context.year.spent_cents, 65000);
    assert_eq!(context.year.net_cents(), 135000);

    // Only July transactions appear in the category table.
    let rent = context.categories.iter().find(|c| c.name == "Rent").unwrap();
    assert_eq!(rent.total_cents, -25000);
}

/// Malformed records are skipped one by one; the rest still aggregate.
#[test]
fn test_malformed_records_are_skipped() {
    let context = build(report_data(vec![
        withdrawal("2026-07-03", "10.00", "Groceries"),
        withdrawal("2026-07-04", "not-a-number", "Groceries"),
        withdrawal("not-a-date", "5.00", "Groceries"),
        raw_tx("mystery-type", "2026-07-05", "5.00"),
        withdrawal("2026-07-06", "2.50", "Groceries"),
    ]));
    let groceries = context
        .categories
        .iter()
        .find(|c| c.name == "Groceries")
        .unwrap();
    assert_eq!(groceries.total_cents, -1250, "only clean records counted");
}

/// An empty transaction stream is a total aggregation failure.
#[test]
fn test_empty_stream_is_fatal() {
    let result = build_report(period(), "EUR", "€", report_data(vec![]));
    assert!(matches!(result, Err(ReportError::Aggregate(_))));
}

/// A stream where every record is malformed fails the same way.
#[test]
fn test_all_malformed_stream_is_fatal() {
    let raw = report_data(vec![raw_tx("withdrawal", "2026-07-03", "banana")]);
    let result = build_report(period(), "EUR", "€", raw);
    assert!(matches!(result, Err(ReportError::Aggregate(_))));
}

/// Over-spending a budget leaves a negative remainder.
#[test]
fn test_budget_remaining_goes_negative() {
    let mut raw = report_data(vec![withdrawal("2026-07-03", "60.00", "Groceries")]);
    raw.budgets = vec![raw_budget("Food", "50.00", "-60.00")];

    let context = build(raw);
    assert_eq!(context.budgets.len(), 1);
    assert_eq!(context.budgets[0].limit_cents, 5000);
    assert_eq!(context.budgets[0].spent_cents, 6000);
    assert_eq!(context.budgets[0].remaining_cents(), -1000);
}

/// Budgets sort by spend magnitude; unspent budgets trail; budgets with
/// neither limit nor spend disappear.
#[test]
fn test_budget_sorting_and_pruning() {
    let mut raw = report_data(vec![withdrawal("2026-07-03", "1.00", "Misc")]);
    raw.budgets = vec![
        raw_budget("Idle", "100.00", "0"),
        raw_budget("Small", "50.00", "-10.00"),
        raw_budget("Empty", "0", "0"),
        raw_budget("Big", "50.00", "-200.00"),
    ];

    let context = build(raw);
    let names: Vec<&str> = context.budgets.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["Big", "Small", "Idle"]);
}

/// Net worth sums asset and liability balances; foreign-currency
/// balances pass through unconverted.
#[test]
fn test_net_worth_sums_balances_unconverted() {
    let mut raw = report_data(vec![withdrawal("2026-07-03", "1.00", "Misc")]);
    raw.balances = vec![
        balance("Checking", "1500.00", "EUR"),
        balance("Mortgage", "-1000.00", "EUR"),
        balance("US Savings", "200.00", "USD"),
    ];

    let context = build(raw);
    assert_eq!(context.net_worth_cents, 70000);
}

/// Accounts with a missing or malformed balance are skipped.
#[test]
fn test_unreadable_balances_are_skipped() {
    let mut raw = report_data(vec![withdrawal("2026-07-03", "1.00", "Misc")]);
    raw.balances = vec![
        balance("Checking", "100.00", "EUR"),
        balance("Broken", "???", "EUR"),
    ];

    let context = build(raw);
    assert_eq!(context.net_worth_cents, 10000);
}
