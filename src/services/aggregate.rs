//! Turns raw API records into the [`ReportContext`].
//!
//! Value-level validation lives here: a record with an unparseable date,
//! amount or type is skipped with a warning and the run carries on.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::date_utils::DateRange;
use crate::error::{ReportError, ReportResult};
use crate::models::category::UNCATEGORIZED;
use crate::models::money::parse_cents;
use crate::models::{
    BudgetSummary, CategorySummary, PeriodTotals, ReportContext, Transaction, TransactionKind,
};
use crate::services::firefly::{RawAccountBalance, RawBudget, RawCategory, RawTransaction};
use crate::services::sankey;

/// Everything the client fetched for one run. Transactions cover the
/// year-to-date range; budgets cover the report month.
pub struct RawReportData {
    pub categories: Vec<RawCategory>,
    pub transactions: Vec<RawTransaction>,
    pub budgets: Vec<RawBudget>,
    pub balances: Vec<RawAccountBalance>,
}

pub fn build_report(
    period: DateRange,
    currency_code: &str,
    currency_symbol: &str,
    raw: RawReportData,
) -> ReportResult<ReportContext> {
    let transactions = normalize_transactions(raw.transactions);
    if transactions.is_empty() {
        return Err(ReportError::Aggregate(format!(
            "no usable transactions between {} and {}",
            period.year_to_date().from_str(),
            period.to_str()
        )));
    }

    let month_transactions: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| period.contains(t.date))
        .collect();

    let categories = category_summaries(&raw.categories, &month_transactions);
    let budgets = budget_summaries(raw.budgets);
    let month = period_totals(month_transactions.iter().copied());
    let year = period_totals(transactions.iter());
    let net_worth_cents = net_worth(&raw.balances, currency_code);
    let flow = sankey::derive_flow(&month_transactions, &budgets);

    Ok(ReportContext {
        period,
        currency_code: currency_code.to_string(),
        currency_symbol: currency_symbol.to_string(),
        categories,
        budgets,
        month,
        year,
        net_worth_cents,
        flow,
    })
}

/// Parse raw records into transactions, skipping anything malformed.
/// Deposits come out positive, withdrawals negative.
fn normalize_transactions(raw: Vec<RawTransaction>) -> Vec<Transaction> {
    let mut transactions = Vec::with_capacity(raw.len());
    for record in raw {
        let Some(kind) = TransactionKind::parse(&record.kind) else {
            warn!(kind = %record.kind, "Skipping transaction with unknown type");
            continue;
        };
        let Some(date) = parse_date(&record.date) else {
            warn!(date = %record.date, "Skipping transaction with unparseable date");
            continue;
        };
        let Some(magnitude) = parse_cents(&record.amount) else {
            warn!(amount = %record.amount, "Skipping transaction with unparseable amount");
            continue;
        };

        let amount_cents = match kind {
            TransactionKind::Deposit => magnitude.abs(),
            TransactionKind::Withdrawal => -magnitude.abs(),
            TransactionKind::Transfer => magnitude,
        };

        transactions.push(Transaction {
            date,
            amount_cents,
            kind,
            currency_code: record.currency_code.unwrap_or_default(),
            category: record.category_name.filter(|name| !name.is_empty()),
            budget: record.budget_name.filter(|name| !name.is_empty()),
            source: record.source_name.filter(|name| !name.is_empty()),
        });
    }
    transactions
}

/// Dates arrive as RFC 3339 timestamps; the date part is all we need.
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()
}

/// Group the month's transactions by exact category name. The roster
/// seeds zero rows; uncategorized spend gets its own bucket only when
/// such transactions exist.
fn category_summaries(
    roster: &[RawCategory],
    month_transactions: &[&Transaction],
) -> Vec<CategorySummary> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, i64> = HashMap::new();
    for category in roster {
        if !totals.contains_key(&category.name) {
            order.push(category.name.clone());
            totals.insert(category.name.clone(), 0);
        }
    }

    let mut uncategorized_total = 0i64;
    let mut has_uncategorized = false;
    for transaction in month_transactions {
        if transaction.kind == TransactionKind::Transfer {
            continue;
        }
        match &transaction.category {
            Some(name) => {
                if !totals.contains_key(name) {
                    order.push(name.clone());
                }
                *totals.entry(name.clone()).or_insert(0) += transaction.amount_cents;
            }
            None => {
                has_uncategorized = true;
                uncategorized_total += transaction.amount_cents;
            }
        }
    }

    let mut summaries: Vec<CategorySummary> = order
        .into_iter()
        .map(|name| {
            let total_cents = totals[&name];
            CategorySummary { name, total_cents }
        })
        .collect();
    if has_uncategorized {
        summaries.push(CategorySummary {
            name: UNCATEGORIZED.to_string(),
            total_cents: uncategorized_total,
        });
    }

    sort_by_magnitude(&mut summaries, |summary| summary.total_cents);
    summaries
}

fn budget_summaries(raw: Vec<RawBudget>) -> Vec<BudgetSummary> {
    let mut budgets = Vec::with_capacity(raw.len());
    for record in raw {
        let Some(limit_cents) = parse_cents(&record.limit) else {
            warn!(budget = %record.name, limit = %record.limit, "Skipping budget with unparseable limit");
            continue;
        };
        let Some(spent) = parse_cents(&record.spent) else {
            warn!(budget = %record.name, spent = %record.spent, "Skipping budget with unparseable spend");
            continue;
        };
        // The API reports period spend as a negative sum.
        let spent_cents = spent.abs();
        if limit_cents == 0 && spent_cents == 0 {
            continue;
        }
        budgets.push(BudgetSummary {
            name: record.name,
            limit_cents,
            spent_cents,
        });
    }
    sort_by_magnitude(&mut budgets, |budget| budget.spent_cents);
    budgets
}

/// Descending by magnitude, stable tie-break on insertion order, with the
/// zero-valued entries as a trailing block in their original order.
fn sort_by_magnitude<T>(items: &mut [T], amount: impl Fn(&T) -> i64) {
    items.sort_by_key(|item| {
        let cents = amount(item);
        (cents == 0, std::cmp::Reverse(cents.abs()))
    });
}

fn period_totals<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for transaction in transactions {
        match transaction.kind {
            TransactionKind::Deposit => totals.earned_cents += transaction.amount_cents,
            TransactionKind::Withdrawal => totals.spent_cents += -transaction.amount_cents,
            TransactionKind::Transfer => {}
        }
    }
    totals
}

/// Sum current balances across accounts. Balances in a currency other
/// than the report's are summed unconverted; that mismatch is warned
/// about, not fixed.
fn net_worth(balances: &[RawAccountBalance], report_currency: &str) -> i64 {
    let mut sum = 0i64;
    let mut mixed = false;
    for account in balances {
        let Some(raw_balance) = &account.current_balance else {
            warn!(account = %account.name, "Skipping account without a current balance");
            continue;
        };
        let Some(cents) = parse_cents(raw_balance) else {
            warn!(account = %account.name, balance = %raw_balance, "Skipping account with unparseable balance");
            continue;
        };
        if let Some(code) = &account.currency_code {
            if code != report_currency {
                mixed = true;
            }
        }
        sum += cents;
    }
    if mixed {
        warn!("Account balances span multiple currencies; net worth sums them unconverted");
    }
    sum
}
