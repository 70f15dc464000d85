use crate::domain::account::Account;
use crate::domain::error::BankError;
use crate::domain::user::User;
use crate::infrastructure::storage::bank_store::BankStore;
use crate::validators::transaction_validator::{validate_account_name, validate_opening_balance};
use serde::Deserialize;
use std::sync::Arc;

/// Create/update request body for accounts.
#[derive(Debug, Deserialize)]
pub struct AccountInput {
    pub account_name: Option<String>,
    /// Optional opening balance; accounts may start with no balance at all.
    pub amount: Option<serde_json::Value>,
}

pub struct AccountService {
    store: Arc<BankStore>,
}

impl AccountService {
    pub fn new(store: Arc<BankStore>) -> Self {
        Self { store }
    }

    /// Open an account for the given owner. The account number is generated
    /// by the store, which retries on the (unlikely) collision.
    pub fn create_account(&self, owner: &User, input: &AccountInput) -> Result<Account, BankError> {
        let account_name = validate_account_name(input.account_name.as_deref())?;
        let opening_balance = validate_opening_balance(input.amount.as_ref())?;
        self.store
            .insert_account(owner.id, account_name, opening_balance)
    }

    pub fn get_account(&self, account_id: i64) -> Result<Account, BankError> {
        self.store.get_account(account_id)
    }

    pub fn list_accounts(&self) -> Vec<Account> {
        self.store.list_accounts()
    }

    /// Rename an account. The balance is only ever touched by the
    /// transaction engine, and the account number is immutable.
    pub fn update_account(
        &self,
        account_id: i64,
        input: &AccountInput,
    ) -> Result<Account, BankError> {
        let account_name = validate_account_name(input.account_name.as_deref())?;
        self.store.update_account_name(account_id, account_name)
    }

    pub fn delete_account(&self, account_id: i64) -> Result<(), BankError> {
        self.store.delete_account(account_id)
    }
}
