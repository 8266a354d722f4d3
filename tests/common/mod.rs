//! Shared builders for aggregation, flow, and rendering tests. Methods
//! are intentionally broad to support scenarios across test files.

#![allow(dead_code)]

use chrono::NaiveDate;
use firefly_report::date_utils::DateRange;
use firefly_report::models::{BudgetSummary, Transaction, TransactionKind};
use firefly_report::services::aggregate::RawReportData;
use firefly_report::services::firefly::{
    RawAccountBalance, RawBudget, RawCategory, RawTransaction,
};

/// Report period used throughout the tests: July 2026.
pub fn period() -> DateRange {
    DateRange::previous_month(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap())
}

pub fn raw_tx(kind: &str, date: &str, amount: &str) -> RawTransaction {
    RawTransaction {
        kind: kind.into(),
        date: format!("{date}T00:00:00+00:00"),
        amount: amount.into(),
        currency_code: Some("EUR".into()),
        category_name: None,
        budget_name: None,
        source_name: None,
    }
}

pub fn withdrawal(date: &str, amount: &str, category: &str) -> RawTransaction {
    RawTransaction {
        category_name: Some(category.into()),
        ..raw_tx("withdrawal", date, amount)
    }
}

pub fn deposit(date: &str, amount: &str, category: &str, source: &str) -> RawTransaction {
    RawTransaction {
        category_name: Some(category.into()),
        source_name: Some(source.into()),
        ..raw_tx("deposit", date, amount)
    }
}

pub fn raw_category(id: &str, name: &str) -> RawCategory {
    RawCategory {
        id: id.into(),
        name: name.into(),
    }
}

pub fn raw_budget(name: &str, limit: &str, spent: &str) -> RawBudget {
    RawBudget {
        name: name.into(),
        limit: limit.into(),
        spent: spent.into(),
    }
}

pub fn balance(name: &str, amount: &str, currency: &str) -> RawAccountBalance {
    RawAccountBalance {
        name: name.into(),
        current_balance: Some(amount.into()),
        currency_code: Some(currency.into()),
    }
}

pub fn report_data(transactions: Vec<RawTransaction>) -> RawReportData {
    RawReportData {
        categories: vec![],
        transactions,
        budgets: vec![],
        balances: vec![],
    }
}

/// Normalized transaction inside the report month, for flow tests.
pub fn month_tx(
    kind: TransactionKind,
    amount_cents: i64,
    category: Option<&str>,
    budget: Option<&str>,
    source: Option<&str>,
) -> Transaction {
    Transaction {
        date: NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
        amount_cents,
        kind,
        currency_code: "EUR".into(),
        category: category.map(Into::into),
        budget: budget.map(Into::into),
        source: source.map(Into::into),
    }
}

pub fn budget_summary(name: &str, limit_cents: i64, spent_cents: i64) -> BudgetSummary {
    BudgetSummary {
        name: name.into(),
        limit_cents,
        spent_cents,
    }
}
