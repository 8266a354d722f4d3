//! Derives the income → budget → category flow graph for the money-flow
//! chart.
//!
//! Every edge weight comes from the same month transaction stream, so
//! each hub conserves flow: income sources feed "Total Income", which
//! fans out to budgets (or "Unbudgeted"), which fan out to expense
//! categories, with any positive month surplus draining to "Savings".

use std::collections::HashMap;

use crate::models::category::UNCATEGORIZED;
use crate::models::flow::{
    FlowEdge, FlowGraph, INCOME_HUB, OTHER_INCOME, SAVINGS_NODE, SAVINGS_NODE_ALT, UNBUDGETED_NODE,
};
use crate::models::{BudgetSummary, Transaction, TransactionKind};

pub fn derive_flow(month_transactions: &[&Transaction], budgets: &[BudgetSummary]) -> FlowGraph {
    let mut edges = Vec::new();

    // Income sources feed the hub.
    let income_by_source = income_by_source(month_transactions);
    let total_income_cents: i64 = income_by_source.iter().map(|(_, cents)| cents).sum();
    for (source, cents) in income_by_source {
        edges.push(FlowEdge {
            source,
            target: INCOME_HUB.to_string(),
            weight_cents: cents,
        });
    }

    // Spend per (budget, category) pair; each budget's edge into a
    // category carries exactly that budget's share of the category spend.
    let spend = spend_by_budget_and_category(month_transactions);
    let total_spent_cents: i64 = spend.iter().map(|((_, _), cents)| cents).sum();

    let mut budget_order: Vec<String> = Vec::new();
    let mut budget_totals: HashMap<String, i64> = HashMap::new();
    for ((budget, _), cents) in &spend {
        if !budget_totals.contains_key(budget) {
            budget_order.push(budget.clone());
        }
        *budget_totals.entry(budget.clone()).or_insert(0) += cents;
    }
    for budget in budget_order {
        let cents = budget_totals[&budget];
        edges.push(FlowEdge {
            source: INCOME_HUB.to_string(),
            target: budget,
            weight_cents: cents,
        });
    }
    for ((budget, category), cents) in spend {
        edges.push(FlowEdge {
            source: budget,
            target: category,
            weight_cents: cents,
        });
    }

    // Unspent income drains to savings, but only when the month closed
    // positive. The label dodges any budget actually named "Savings".
    let net_cents = total_income_cents - total_spent_cents;
    if net_cents > 0 {
        edges.push(FlowEdge {
            source: INCOME_HUB.to_string(),
            target: savings_label(budgets).to_string(),
            weight_cents: net_cents,
        });
    }

    FlowGraph {
        edges,
        total_income_cents,
    }
}

fn savings_label(budgets: &[BudgetSummary]) -> &'static str {
    let collides = budgets
        .iter()
        .any(|budget| budget.name.eq_ignore_ascii_case(SAVINGS_NODE));
    if collides {
        SAVINGS_NODE_ALT
    } else {
        SAVINGS_NODE
    }
}

/// Month deposits summed per source account, first-seen order.
fn income_by_source(month_transactions: &[&Transaction]) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, i64> = HashMap::new();
    for transaction in month_transactions {
        if transaction.kind != TransactionKind::Deposit {
            continue;
        }
        let source = transaction
            .source
            .clone()
            .unwrap_or_else(|| OTHER_INCOME.to_string());
        if !totals.contains_key(&source) {
            order.push(source.clone());
        }
        *totals.entry(source).or_insert(0) += transaction.amount_cents;
    }
    order
        .into_iter()
        .map(|source| {
            let cents = totals[&source];
            (source, cents)
        })
        .collect()
}

/// Month withdrawals summed per (budget, category) pair, first-seen
/// order. Missing budgets and categories fall into their pass-through
/// buckets so no spend leaves the graph.
fn spend_by_budget_and_category(month_transactions: &[&Transaction]) -> Vec<((String, String), i64)> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut totals: HashMap<(String, String), i64> = HashMap::new();
    for transaction in month_transactions {
        if transaction.kind != TransactionKind::Withdrawal {
            continue;
        }
        let budget = transaction
            .budget
            .clone()
            .unwrap_or_else(|| UNBUDGETED_NODE.to_string());
        let category = transaction
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let key = (budget, category);
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        *totals.entry(key).or_insert(0) += -transaction.amount_cents;
    }
    order
        .into_iter()
        .map(|key| {
            let cents = totals[&key];
            (key, cents)
        })
        .collect()
}
