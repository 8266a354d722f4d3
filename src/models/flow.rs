//! The income → budget → category flow graph behind the Sankey view.
//! Derived fresh from the month's transactions, never persisted.

/// Hub collecting all income edges.
pub const INCOME_HUB: &str = "Total Income";
/// Sink for unspent income when the month closed positive.
pub const SAVINGS_NODE: &str = "Savings";
/// Fallback sink label when a budget is already named "Savings".
pub const SAVINGS_NODE_ALT: &str = "Net Savings";
/// Pass-through node for expenses that belong to no budget.
pub const UNBUDGETED_NODE: &str = "Unbudgeted";
/// Income source label for deposits without a source account.
pub const OTHER_INCOME: &str = "Other Income";

/// A weighted edge in the flow graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub weight_cents: i64,
}

#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub edges: Vec<FlowEdge>,
    /// Total month income; the denominator for tooltip percentages.
    pub total_income_cents: i64,
}

impl FlowGraph {
    /// Sum of weights flowing into `node`.
    pub fn inflow(&self, node: &str) -> i64 {
        self.edges
            .iter()
            .filter(|e| e.target == node)
            .map(|e| e.weight_cents)
            .sum()
    }

    /// Sum of weights flowing out of `node`.
    pub fn outflow(&self, node: &str) -> i64 {
        self.edges
            .iter()
            .filter(|e| e.source == node)
            .map(|e| e.weight_cents)
            .sum()
    }
}
