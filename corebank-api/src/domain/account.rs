use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const ACCOUNT_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ACCOUNT_NUMBER_SUFFIX_LEN: usize = 6;

/// A bank account. Owned by exactly one user; the balance is mutated only
/// through the transaction engine's unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub account_name: String,
    pub account_number: String,
    /// No balance until the first deposit posts (or one is supplied at
    /// creation). Must never go negative after a debit.
    pub amount: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Effective balance: an account with no posted balance holds zero.
    pub fn balance(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

/// Generate a candidate account number: `"{unix_seconds}-{6 chars of [A-Z0-9]}"`.
///
/// Uniqueness is best-effort: the timestamp prefix plus a 36^6 suffix space
/// makes collisions unlikely but not impossible, so the store re-invokes the
/// generator when an insert hits an existing number.
pub fn generate_account_number() -> String {
    let timestamp = Utc::now().timestamp();
    let mut rng = rand::rng();
    let suffix: String = (0..ACCOUNT_NUMBER_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ACCOUNT_NUMBER_CHARSET.len());
            ACCOUNT_NUMBER_CHARSET[idx] as char
        })
        .collect();
    format!("{timestamp}-{suffix}")
}
