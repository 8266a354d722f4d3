use crate::date_utils::DateRange;
use crate::models::budget::BudgetSummary;
use crate::models::category::CategorySummary;
use crate::models::flow::FlowGraph;

/// Earned and spent totals over one period. Both are magnitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    pub earned_cents: i64,
    pub spent_cents: i64,
}

impl PeriodTotals {
    pub fn net_cents(&self) -> i64 {
        self.earned_cents - self.spent_cents
    }
}

/// Everything the renderer needs for one report run.
///
/// Built fresh each run and owned by it; nothing here persists.
/// The category and budget lists are sorted descending by magnitude with
/// all zero-valued entries relocated to a trailing block.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub period: DateRange,
    pub currency_code: String,
    pub currency_symbol: String,
    pub categories: Vec<CategorySummary>,
    pub budgets: Vec<BudgetSummary>,
    pub month: PeriodTotals,
    pub year: PeriodTotals,
    pub net_worth_cents: i64,
    pub flow: FlowGraph,
}
