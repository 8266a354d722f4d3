/// Bucket name for transactions without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Signed category total for the report period. Unique per category per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub name: String,
    pub total_cents: i64,
}

impl CategorySummary {
    pub fn is_zero(&self) -> bool {
        self.total_cents == 0
    }
}
