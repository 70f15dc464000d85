use crate::domain::account::{generate_account_number, Account};
use crate::domain::error::BankError;
use crate::domain::transaction::{TransactionKind, TransactionRecord};
use crate::domain::user::User;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::debug;

const USERS_FILE: &str = "users.json";
const ACCOUNTS_FILE: &str = "accounts.json";
const TRANSACTIONS_FILE: &str = "transactions.json";

/// Account-number generation is best-effort unique; a handful of retries
/// covers the realistic collision case (same-second creations drawing the
/// same 6-char suffix).
const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

/// Fields for a user row about to be inserted.
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// A ledger append staged by the transaction engine inside a unit of work.
/// Nothing here has touched the store yet; the id and timestamp are assigned
/// at commit.
pub struct NewLedgerEntry {
    pub new_balance: Decimal,
    pub amount: Decimal,
    pub description: String,
    pub kind: TransactionKind,
    pub ip_address: String,
}

struct Ledger {
    entries: Vec<TransactionRecord>,
    next_id: i64,
    last_timestamp: DateTime<Utc>,
}

impl Ledger {
    fn append(&mut self, account_id: i64, staged: &NewLedgerEntry) -> TransactionRecord {
        // Server-assigned timestamps never run backwards across insertions,
        // even if the wall clock does.
        let mut now = Utc::now();
        if now < self.last_timestamp {
            now = self.last_timestamp;
        }
        self.last_timestamp = now;

        let record = TransactionRecord {
            id: self.next_id,
            account_id,
            amount: staged.amount,
            description: staged.description.clone(),
            kind: staged.kind,
            ip_address: staged.ip_address.clone(),
            timestamp: now,
        };
        self.next_id += 1;
        self.entries.push(record.clone());
        record
    }

    fn rollback_last(&mut self) {
        if self.entries.pop().is_some() {
            self.next_id -= 1;
        }
    }
}

/// Durable store for users, accounts and the transaction ledger.
///
/// In-process maps guarded by locks, snapshotted to JSON files under the
/// data directory after every committed mutation. Balance changes go through
/// [`BankStore::apply_to_account`], which serializes all work on one account
/// behind that account's row lock while leaving other accounts untouched.
///
/// Lock order everywhere: row lock(s) -> users -> accounts -> ledger.
pub struct BankStore {
    data_dir: PathBuf,
    users: RwLock<HashMap<i64, User>>,
    accounts: RwLock<HashMap<i64, Account>>,
    ledger: Mutex<Ledger>,
    row_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
    next_user_id: AtomicI64,
    next_account_id: AtomicI64,
}

impl BankStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        let users: Vec<User> = load_json(&data_dir.join(USERS_FILE))?.unwrap_or_default();
        let accounts: Vec<Account> = load_json(&data_dir.join(ACCOUNTS_FILE))?.unwrap_or_default();
        let entries: Vec<TransactionRecord> =
            load_json(&data_dir.join(TRANSACTIONS_FILE))?.unwrap_or_default();

        let next_user_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let next_account_id = accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let next_entry_id = entries.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let last_timestamp = entries
            .iter()
            .map(|t| t.timestamp)
            .max()
            .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC);

        Ok(Self {
            data_dir,
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
            accounts: RwLock::new(accounts.into_iter().map(|a| (a.id, a)).collect()),
            ledger: Mutex::new(Ledger {
                entries,
                next_id: next_entry_id,
                last_timestamp,
            }),
            row_locks: Mutex::new(HashMap::new()),
            next_user_id: AtomicI64::new(next_user_id),
            next_account_id: AtomicI64::new(next_account_id),
        })
    }

    // === Users ===

    pub fn insert_user(&self, new_user: NewUser) -> Result<User, BankError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == new_user.email) {
            return Err(BankError::conflict("A user with this email already exists"));
        }

        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone_number: new_user.phone_number,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        self.persist_users(&users)
            .map_err(|e| BankError::storage(e.to_string()))?;
        Ok(user)
    }

    pub fn get_user(&self, user_id: i64) -> Result<User, BankError> {
        self.users
            .read()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(BankError::UserNotFound(user_id))
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        users.sort_by_key(|u| u.id);
        users
    }

    pub fn update_user(
        &self,
        user_id: i64,
        apply: impl FnOnce(&mut User),
    ) -> Result<User, BankError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(&user_id)
            .ok_or(BankError::UserNotFound(user_id))?;
        apply(user);
        let updated = user.clone();
        self.persist_users(&users)
            .map_err(|e| BankError::storage(e.to_string()))?;
        Ok(updated)
    }

    /// Delete a user and cascade to its accounts and their transactions.
    pub fn delete_user(&self, user_id: i64) -> Result<(), BankError> {
        // Serialize against in-flight transactions on the owned accounts.
        let mut owned: Vec<i64> = {
            let accounts = self.accounts.read().unwrap();
            accounts
                .values()
                .filter(|a| a.user_id == user_id)
                .map(|a| a.id)
                .collect()
        };
        owned.sort_unstable();
        let row_locks: Vec<Arc<Mutex<()>>> =
            owned.iter().map(|id| self.row_lock(*id)).collect();
        let _guards: Vec<_> = row_locks.iter().map(|l| l.lock().unwrap()).collect();

        let mut users = self.users.write().unwrap();
        if users.remove(&user_id).is_none() {
            return Err(BankError::UserNotFound(user_id));
        }
        let mut accounts = self.accounts.write().unwrap();
        // Recompute under the write lock; an account opened since the
        // snapshot above must not survive as an orphan.
        let owned: Vec<i64> = accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.id)
            .collect();
        accounts.retain(|_, a| a.user_id != user_id);
        let mut ledger = self.ledger.lock().unwrap();
        ledger.entries.retain(|t| !owned.contains(&t.account_id));

        self.persist_users(&users)
            .and_then(|_| self.persist_accounts(&accounts))
            .and_then(|_| self.persist_ledger(&ledger))
            .map_err(|e| BankError::storage(e.to_string()))?;

        drop(_guards);
        let mut locks = self.row_locks.lock().unwrap();
        for id in &owned {
            locks.remove(id);
        }
        Ok(())
    }

    // === Accounts ===

    pub fn insert_account(
        &self,
        user_id: i64,
        account_name: String,
        opening_balance: Option<Decimal>,
    ) -> Result<Account, BankError> {
        // Owner must exist before taking the accounts write lock.
        self.get_user(user_id)?;

        let mut accounts = self.accounts.write().unwrap();
        let account_number = self.unique_account_number(&accounts)?;
        let account = Account {
            id: self.next_account_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            account_name,
            account_number,
            amount: opening_balance,
            created_at: Utc::now(),
        };
        accounts.insert(account.id, account.clone());
        self.persist_accounts(&accounts)
            .map_err(|e| BankError::storage(e.to_string()))?;
        Ok(account)
    }

    /// Re-invoke the generator until the candidate misses every existing
    /// number. Uniqueness stays probabilistic, so after a bounded number of
    /// attempts we give up rather than loop.
    fn unique_account_number(
        &self,
        accounts: &HashMap<i64, Account>,
    ) -> Result<String, BankError> {
        for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
            let candidate = generate_account_number();
            if !accounts.values().any(|a| a.account_number == candidate) {
                return Ok(candidate);
            }
        }
        Err(BankError::internal(
            "Could not generate a unique account number",
        ))
    }

    pub fn get_account(&self, account_id: i64) -> Result<Account, BankError> {
        self.accounts
            .read()
            .unwrap()
            .get(&account_id)
            .cloned()
            .ok_or(BankError::AccountNotFound(account_id))
    }

    pub fn list_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> =
            self.accounts.read().unwrap().values().cloned().collect();
        accounts.sort_by_key(|a| a.id);
        accounts
    }

    pub fn update_account_name(
        &self,
        account_id: i64,
        account_name: String,
    ) -> Result<Account, BankError> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts
            .get_mut(&account_id)
            .ok_or(BankError::AccountNotFound(account_id))?;
        account.account_name = account_name;
        let updated = account.clone();
        self.persist_accounts(&accounts)
            .map_err(|e| BankError::storage(e.to_string()))?;
        Ok(updated)
    }

    /// Delete an account and cascade to its transactions.
    pub fn delete_account(&self, account_id: i64) -> Result<(), BankError> {
        let row = self.row_lock(account_id);
        let guard = row.lock().unwrap();

        let mut accounts = self.accounts.write().unwrap();
        if accounts.remove(&account_id).is_none() {
            return Err(BankError::AccountNotFound(account_id));
        }
        let mut ledger = self.ledger.lock().unwrap();
        ledger.entries.retain(|t| t.account_id != account_id);

        self.persist_accounts(&accounts)
            .and_then(|_| self.persist_ledger(&ledger))
            .map_err(|e| BankError::storage(e.to_string()))?;

        drop(guard);
        self.row_locks.lock().unwrap().remove(&account_id);
        Ok(())
    }

    // === Unit of work ===

    /// Run a balance-affecting unit of work against one account.
    ///
    /// The closure sees a snapshot of the account and returns the staged
    /// outcome: the new balance plus the ledger entry to append. On `Ok`,
    /// balance write and ledger append commit together (and the snapshot
    /// files are rewritten); on `Err`, the store is untouched. All calls for
    /// the same account serialize on the account's row lock; calls for
    /// different accounts proceed in parallel.
    pub fn apply_to_account(
        &self,
        account_id: i64,
        work: impl FnOnce(&Account) -> Result<NewLedgerEntry, BankError>,
    ) -> Result<TransactionRecord, BankError> {
        let row = self.row_lock(account_id);
        let _serial = row.lock().unwrap();

        let snapshot = self.get_account(account_id)?;
        let staged = work(&snapshot)?;

        let mut accounts = self.accounts.write().unwrap();
        let mut ledger = self.ledger.lock().unwrap();

        let previous_amount = match accounts.get_mut(&account_id) {
            Some(account) => {
                let previous = account.amount;
                account.amount = Some(staged.new_balance);
                previous
            }
            None => return Err(BankError::AccountNotFound(account_id)),
        };
        let record = ledger.append(account_id, &staged);

        if let Err(e) = self
            .persist_accounts(&accounts)
            .and_then(|_| self.persist_ledger(&ledger))
        {
            // Roll the unit of work back whole: no partial balance/ledger
            // state survives a persistence failure.
            if let Some(account) = accounts.get_mut(&account_id) {
                account.amount = previous_amount;
            }
            ledger.rollback_last();
            return Err(BankError::storage(e.to_string()));
        }

        debug!(
            "Committed {} {} on account {} (entry {})",
            record.kind, record.amount, account_id, record.id
        );
        Ok(record)
    }

    // === Ledger queries ===

    /// All entries for an account, newest first (timestamp, then insertion
    /// order). Optional exact-match description filter.
    pub fn transactions_for_account(
        &self,
        account_id: i64,
        description: Option<&str>,
    ) -> Vec<TransactionRecord> {
        let ledger = self.ledger.lock().unwrap();
        let mut entries: Vec<TransactionRecord> = ledger
            .entries
            .iter()
            .filter(|t| t.account_id == account_id)
            .filter(|t| description.map_or(true, |d| t.description == d))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries
    }

    // === Internals ===

    fn row_lock(&self, account_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.row_locks.lock().unwrap();
        locks
            .entry(account_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn persist_users(&self, users: &HashMap<i64, User>) -> Result<()> {
        let mut rows: Vec<&User> = users.values().collect();
        rows.sort_by_key(|u| u.id);
        write_json(&self.data_dir.join(USERS_FILE), &rows)
    }

    fn persist_accounts(&self, accounts: &HashMap<i64, Account>) -> Result<()> {
        let mut rows: Vec<&Account> = accounts.values().collect();
        rows.sort_by_key(|a| a.id);
        write_json(&self.data_dir.join(ACCOUNTS_FILE), &rows)
    }

    fn persist_ledger(&self, ledger: &Ledger) -> Result<()> {
        write_json(&self.data_dir.join(TRANSACTIONS_FILE), &ledger.entries)
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    fs::write(path, data)?;
    Ok(())
}
