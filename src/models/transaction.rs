use chrono::NaiveDate;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Withdrawal,
    Deposit,
    Transfer,
}

impl TransactionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "withdrawal" => Some(Self::Withdrawal),
            "deposit" => Some(Self::Deposit),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

/// A transaction normalized at the aggregation boundary.
/// Immutable once built: deposits carry positive cents, withdrawals negative.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub kind: TransactionKind,
    pub currency_code: String,
    pub category: Option<String>,
    pub budget: Option<String>,
    /// Source account; for deposits this is the income source.
    pub source: Option<String>,
}
