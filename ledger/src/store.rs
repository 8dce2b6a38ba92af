//! In-memory registry of accounts keyed by name.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use bankledger_common::{validate_opening, LedgerError, Result};

use crate::account::{validate_name, Account};

/// An account record shared between the store and in-flight operations.
pub type SharedAccount = Arc<Mutex<Account>>;

/// Maps account names to account records.
///
/// The map lock guards membership only; every record carries its own
/// mutex, so operations on different accounts never contend. Iteration
/// follows insertion order.
#[derive(Default)]
pub struct LedgerStore {
    accounts: RwLock<IndexMap<String, SharedAccount>>,
}

impl LedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account. The opening balance defaults to zero.
    pub fn create(&self, name: &str, opening_balance: Option<f64>) -> Result<SharedAccount> {
        validate_name(name)?;
        let balance = validate_opening(opening_balance.unwrap_or(0.0))?;

        let mut accounts = self.accounts.write();
        if accounts.contains_key(name) {
            return Err(LedgerError::DuplicateAccount(name.to_string()));
        }

        let account = Account::new(name, balance);
        info!(account = %name, id = %account.id, balance, "Account created");

        let shared = Arc::new(Mutex::new(account));
        accounts.insert(name.to_string(), shared.clone());
        Ok(shared)
    }

    /// Look up an account by name.
    pub fn lookup(&self, name: &str) -> Result<SharedAccount> {
        let found = self.accounts.read().get(name).cloned();
        match found {
            Some(account) => Ok(account),
            None => {
                debug!(account = %name, "Account lookup missed");
                Err(LedgerError::AccountNotFound(name.to_string()))
            }
        }
    }

    /// Discard every account and install `accounts` in their place.
    ///
    /// Records still held by in-flight operations are detached from the
    /// store; their mutations no longer show up in lookups.
    pub fn replace_all(&self, accounts: impl IntoIterator<Item = Account>) {
        let replacement: IndexMap<String, SharedAccount> = accounts
            .into_iter()
            .map(|account| (account.name.clone(), Arc::new(Mutex::new(account))))
            .collect();

        let count = replacement.len();
        *self.accounts.write() = replacement;
        info!(accounts = count, "Store replaced");
    }

    /// Copy out every account, each read under its own lock.
    pub fn snapshot_all(&self) -> Vec<Account> {
        self.accounts
            .read()
            .values()
            .map(|account| account.lock().clone())
            .collect()
    }

    /// Names of all accounts, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.accounts.read().keys().cloned().collect()
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    /// Check if the store holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Remove every account.
    pub fn clear(&self) {
        self.accounts.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let store = LedgerStore::new();
        store.create("Alice", Some(100.0)).unwrap();

        let alice = store.lookup("Alice").unwrap();
        assert_eq!(alice.lock().balance, 100.0);
        assert_eq!(alice.lock().name, "Alice");
    }

    #[test]
    fn test_default_opening_balance() {
        let store = LedgerStore::new();
        let account = store.create("Alice", None).unwrap();
        assert_eq!(account.lock().balance, 0.0);
    }

    #[test]
    fn test_duplicate_account() {
        let store = LedgerStore::new();
        store.create("Alice", Some(100.0)).unwrap();

        for balance in [Some(100.0), Some(200.0), None] {
            let err = store.create("Alice", balance).unwrap_err();
            assert_eq!(err, LedgerError::DuplicateAccount("Alice".into()));
        }
        assert_eq!(store.lookup("Alice").unwrap().lock().balance, 100.0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lookup_missing() {
        let store = LedgerStore::new();
        assert_eq!(
            store.lookup("NonExistent").unwrap_err(),
            LedgerError::AccountNotFound("NonExistent".into())
        );
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let store = LedgerStore::new();
        assert!(store.create("", None).is_err());
        assert!(store.create("semi;colon", None).is_err());
        assert_eq!(
            store.create("Alice", Some(-10.0)).unwrap_err(),
            LedgerError::InvalidAmount(-10.0)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_lookup_shares_the_record() {
        let store = LedgerStore::new();
        store.create("Alice", Some(100.0)).unwrap();

        store.lookup("Alice").unwrap().lock().deposit(50.0).unwrap();
        assert_eq!(store.lookup("Alice").unwrap().lock().balance, 150.0);
    }

    #[test]
    fn test_replace_all() {
        let store = LedgerStore::new();
        store.create("Alice", Some(100.0)).unwrap();

        store.replace_all(vec![Account::new("Bob", 5.0), Account::new("Carol", 7.0)]);

        assert!(store.lookup("Alice").is_err());
        assert_eq!(store.names(), vec!["Bob", "Carol"]);
    }

    #[test]
    fn test_snapshot_all_preserves_insertion_order() {
        let store = LedgerStore::new();
        store.create("Zed", Some(1.0)).unwrap();
        store.create("Amy", Some(2.0)).unwrap();

        let names: Vec<_> = store
            .snapshot_all()
            .into_iter()
            .map(|account| account.name)
            .collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
    }

    #[test]
    fn test_clear() {
        let store = LedgerStore::new();
        store.create("Alice", None).unwrap();
        store.clear();
        assert!(store.is_empty());
    }
}
