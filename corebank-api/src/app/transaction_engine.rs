use crate::domain::error::BankError;
use crate::domain::transaction::{TransactionKind, TransactionRecord};
use crate::infrastructure::storage::bank_store::{BankStore, NewLedgerEntry};
use crate::validators::transaction_validator::{validate_amount, validate_description};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Raw create-transaction request body. Fields arrive untyped so the engine
/// can produce precise validation errors instead of deserialization noise.
#[derive(Debug, Deserialize)]
pub struct TransactionInput {
    pub amount: Option<serde_json::Value>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Query parameters for the transaction listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub description: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// One page of ledger entries, newest first, with enough metadata to walk
/// the remaining pages.
#[derive(Debug, Serialize)]
pub struct TransactionPage {
    pub count: usize,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub results: Vec<TransactionRecord>,
}

/// The transaction engine: owns the credit/debit invariants and drives the
/// store's unit of work. One balance mutation and one ledger append per
/// successful call; no mutation at all on any failure.
pub struct TransactionEngine {
    store: Arc<BankStore>,
}

impl TransactionEngine {
    pub fn new(store: Arc<BankStore>) -> Self {
        Self { store }
    }

    /// Apply a credit or debit to an account.
    ///
    /// Order of checks: account resolution, then amount/description
    /// validation, then the type branch. A debit below the current balance
    /// fails with `InsufficientFunds` and an unrecognized type with
    /// `InvalidTransactionType`; in both cases the account is untouched.
    pub fn apply_transaction(
        &self,
        account_id: i64,
        input: &TransactionInput,
        ip_address: &str,
    ) -> Result<TransactionRecord, BankError> {
        self.store.apply_to_account(account_id, |account| {
            let amount = validate_amount(input.amount.as_ref())?;
            let description = validate_description(input.description.as_deref())?;
            let raw_kind = input.kind.as_deref().unwrap_or_default();

            let balance = account.balance();
            let (kind, new_balance) = match TransactionKind::parse(raw_kind) {
                Some(TransactionKind::Credit) => (TransactionKind::Credit, balance + amount),
                Some(TransactionKind::Debit) => {
                    if balance < amount {
                        return Err(BankError::InsufficientFunds);
                    }
                    (TransactionKind::Debit, balance - amount)
                }
                None => {
                    return Err(BankError::InvalidTransactionType(raw_kind.to_string()));
                }
            };

            Ok(NewLedgerEntry {
                new_balance,
                amount,
                description,
                kind,
                ip_address: ip_address.to_string(),
            })
        })
    }

    /// Page through an account's ledger, newest first. Offset pagination:
    /// a page past the end is empty rather than an error, so concurrent
    /// inserts shift rows predictably instead of invalidating cursors.
    pub fn list_transactions(
        &self,
        account_id: i64,
        filter: &TransactionFilter,
    ) -> Result<TransactionPage, BankError> {
        let page = filter.page.unwrap_or(1);
        if page == 0 {
            return Err(BankError::validation("page must be at least 1"));
        }
        let page_size = match filter.page_size {
            Some(0) => return Err(BankError::validation("page_size must be at least 1")),
            Some(size) => size.min(MAX_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        };

        let entries = self
            .store
            .transactions_for_account(account_id, filter.description.as_deref());
        let count = entries.len();
        let total_pages = count.div_ceil(page_size as usize).max(1) as u32;

        let start = (page as usize - 1) * page_size as usize;
        let results = entries
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();

        Ok(TransactionPage {
            count,
            page,
            page_size,
            total_pages,
            results,
        })
    }
}
