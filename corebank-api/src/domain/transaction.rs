use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "CREDIT")]
    Credit,
    #[serde(rename = "DEBIT")]
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "CREDIT",
            TransactionKind::Debit => "DEBIT",
        }
    }

    /// Strict parse: anything other than the two canonical spellings is an
    /// invalid transaction type, not a validation fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREDIT" => Some(TransactionKind::Credit),
            "DEBIT" => Some(TransactionKind::Debit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable ledger entry. Created only by the transaction engine,
/// never updated, deleted only when its account is deleted.
///
/// `id` is assigned from a single monotonically increasing sequence, so it
/// doubles as the insertion-order tiebreaker when two entries share a
/// timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub ip_address: String,
    pub timestamp: DateTime<Utc>,
}
