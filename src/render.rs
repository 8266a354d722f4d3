//! Renders the [`ReportContext`] into the HTML email body.
//!
//! All money formatting happens up front in Rust; the template only
//! prints prepared strings. Rendering is a pure function of the context:
//! the same context always produces byte-identical output.

use askama::Template;
use serde::Serialize;

use crate::error::{ReportError, ReportResult};
use crate::filters::{
    amount_class, format_amount, format_magnitude, percent_of, NEGATIVE_CLASS, POSITIVE_CLASS,
};
use crate::models::ReportContext;
use crate::VERSION;

pub struct CategoryRow {
    pub name: String,
    pub amount: String,
    pub class: &'static str,
}

/// Grouped trailing row for entries that saw no activity.
pub struct ZeroRow {
    pub names: String,
    pub amount: String,
}

pub struct BudgetRow {
    pub name: String,
    pub limit: String,
    pub spent: String,
    pub remaining: String,
    pub remaining_class: &'static str,
}

pub struct BudgetZeroRow {
    pub names: String,
    pub limit: String,
    pub spent: String,
    pub remaining: String,
}

pub struct OverviewRow {
    pub label: &'static str,
    pub amount: String,
    pub class: &'static str,
    pub emphasis: bool,
}

/// One Sankey link as the chart script consumes it. The tooltip label is
/// prepared here so the percentage policy lives in Rust, not in JS.
#[derive(Serialize)]
struct SankeyLink {
    from: String,
    to: String,
    flow: i64,
    label: String,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate {
    period_label: String,
    category_rows: Vec<CategoryRow>,
    category_zero_row: Option<ZeroRow>,
    budget_rows: Vec<BudgetRow>,
    budget_zero_row: Option<BudgetZeroRow>,
    overview_rows: Vec<OverviewRow>,
    net_worth_amount: String,
    net_worth_class: &'static str,
    has_flow: bool,
    sankey_json: String,
    version: &'static str,
}

/// Render the full report document.
pub fn render_report(context: &ReportContext) -> ReportResult<String> {
    build_template(context)?
        .render()
        .map_err(|e| ReportError::Template(e.to_string()))
}

/// Plain-text alternative body for the multipart message.
pub fn render_text(context: &ReportContext) -> String {
    let mut lines = vec![
        format!(
            "Firefly III Monthly Report for {}",
            context.period.display_label()
        ),
        String::new(),
    ];
    for row in overview_rows(context) {
        lines.push(format!("{} {}", row.label, row.amount));
    }
    lines.push(format!(
        "Current net worth: {}",
        format_amount(context.net_worth_cents, &context.currency_symbol)
    ));
    lines.push(String::new());
    lines.join("\n")
}

fn build_template(context: &ReportContext) -> ReportResult<ReportTemplate> {
    let symbol = &context.currency_symbol;

    // The context lists are already sorted with zeros trailing; partition
    // preserves that order on both sides.
    let (active_categories, zero_categories): (Vec<_>, Vec<_>) =
        context.categories.iter().partition(|c| !c.is_zero());
    let category_rows = active_categories
        .iter()
        .map(|category| CategoryRow {
            name: category.name.clone(),
            amount: format_amount(category.total_cents, symbol),
            class: amount_class(category.total_cents),
        })
        .collect();
    let category_zero_row = if zero_categories.is_empty() {
        None
    } else {
        Some(ZeroRow {
            names: joined_names(zero_categories.iter().map(|c| c.name.as_str())),
            amount: format_amount(0, symbol),
        })
    };

    let (active_budgets, zero_budgets): (Vec<_>, Vec<_>) =
        context.budgets.iter().partition(|b| !b.is_zero());
    let budget_rows = active_budgets
        .iter()
        .map(|budget| {
            let remaining_cents = budget.remaining_cents();
            BudgetRow {
                name: budget.name.clone(),
                limit: format_amount(budget.limit_cents, symbol),
                spent: format_magnitude(budget.spent_cents, symbol),
                remaining: format_amount(remaining_cents, symbol),
                remaining_class: if remaining_cents < 0 {
                    NEGATIVE_CLASS
                } else {
                    POSITIVE_CLASS
                },
            }
        })
        .collect();
    let budget_zero_row = if zero_budgets.is_empty() {
        None
    } else {
        let total_limit: i64 = zero_budgets.iter().map(|b| b.limit_cents).sum();
        Some(BudgetZeroRow {
            names: joined_names(zero_budgets.iter().map(|b| b.name.as_str())),
            limit: format_amount(total_limit, symbol),
            spent: format_amount(0, symbol),
            remaining: format_amount(total_limit, symbol),
        })
    };

    let links: Vec<SankeyLink> = context
        .flow
        .edges
        .iter()
        .map(|edge| {
            let amount = format_magnitude(edge.weight_cents, symbol);
            let label = match percent_of(edge.weight_cents, context.flow.total_income_cents) {
                Some(percent) => {
                    format!("{} → {}: {} ({})", edge.source, edge.target, amount, percent)
                }
                None => format!("{} → {}: {}", edge.source, edge.target, amount),
            };
            SankeyLink {
                from: edge.source.clone(),
                to: edge.target.clone(),
                flow: edge.weight_cents,
                label,
            }
        })
        .collect();
    let sankey_json = serde_json::to_string(&links)
        .map_err(|e| ReportError::Template(format!("could not serialize flow data: {e}")))?
        // Keep the inline JSON inert inside the <script> block.
        .replace('<', "\\u003c");

    Ok(ReportTemplate {
        period_label: context.period.display_label(),
        category_rows,
        category_zero_row,
        budget_rows,
        budget_zero_row,
        overview_rows: overview_rows(context),
        net_worth_amount: format_amount(context.net_worth_cents, symbol),
        net_worth_class: sign_class(context.net_worth_cents),
        has_flow: !context.flow.edges.is_empty(),
        sankey_json,
        version: VERSION,
    })
}

fn overview_rows(context: &ReportContext) -> Vec<OverviewRow> {
    let symbol = &context.currency_symbol;
    let month_net = context.month.net_cents();
    let year_net = context.year.net_cents();
    vec![
        OverviewRow {
            label: "Spent this month:",
            amount: format_magnitude(context.month.spent_cents, symbol),
            class: NEGATIVE_CLASS,
            emphasis: false,
        },
        OverviewRow {
            label: "Earned this month:",
            amount: format_amount(context.month.earned_cents, symbol),
            class: POSITIVE_CLASS,
            emphasis: false,
        },
        OverviewRow {
            label: "Net change this month:",
            amount: format_amount(month_net, symbol),
            class: sign_class(month_net),
            emphasis: true,
        },
        OverviewRow {
            label: "Spent so far this year:",
            amount: format_magnitude(context.year.spent_cents, symbol),
            class: NEGATIVE_CLASS,
            emphasis: false,
        },
        OverviewRow {
            label: "Earned so far this year:",
            amount: format_amount(context.year.earned_cents, symbol),
            class: POSITIVE_CLASS,
            emphasis: false,
        },
        OverviewRow {
            label: "Net change so far this year:",
            amount: format_amount(year_net, symbol),
            class: sign_class(year_net),
            emphasis: true,
        },
    ]
}

fn sign_class(cents: i64) -> &'static str {
    if cents > 0 {
        POSITIVE_CLASS
    } else {
        NEGATIVE_CLASS
    }
}

fn joined_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
