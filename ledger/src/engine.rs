//! Core ledger engine implementation.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use bankledger_common::{AccountId, LedgerError, Result};

use crate::account::{self, Account};
use crate::snapshot;
use crate::store::LedgerStore;

/// Read-only view of an account, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountView {
    /// Account identifier.
    pub id: AccountId,
    /// Account name.
    pub name: String,
    /// Balance after the operation.
    pub balance: f64,
    /// History entries, oldest first.
    pub transactions: Vec<String>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            balance: account.balance,
            transactions: account.transactions.clone(),
        }
    }
}

/// Outcome of a completed transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReceipt {
    /// Source account name.
    pub from: String,
    /// Destination account name.
    pub to: String,
    /// Amount moved.
    pub amount: f64,
}

/// The ledger engine resolves accounts by name and applies mutations to them.
pub struct LedgerEngine {
    store: Arc<LedgerStore>,
}

impl LedgerEngine {
    /// Create an engine over an existing store.
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Open a new account.
    #[instrument(skip(self))]
    pub fn create_account(&self, name: &str, opening_balance: Option<f64>) -> Result<AccountView> {
        let account = self.store.create(name, opening_balance).map_err(|e| {
            warn!(error = %e, "Account creation rejected");
            e
        })?;
        let view = AccountView::from(&*account.lock());
        Ok(view)
    }

    /// Get the current state of an account.
    pub fn account(&self, name: &str) -> Result<AccountView> {
        let account = self.store.lookup(name)?;
        let view = AccountView::from(&*account.lock());
        Ok(view)
    }

    /// Credit an account.
    #[instrument(skip(self))]
    pub fn deposit(&self, name: &str, amount: f64) -> Result<AccountView> {
        let account = self.store.lookup(name)?;
        let mut account = account.lock();

        if let Err(e) = account.deposit(amount) {
            warn!(error = %e, "Deposit rejected");
            return Err(e);
        }

        info!(balance = account.balance, "Deposit applied");
        Ok(AccountView::from(&*account))
    }

    /// Debit an account.
    #[instrument(skip(self))]
    pub fn withdraw(&self, name: &str, amount: f64) -> Result<AccountView> {
        let account = self.store.lookup(name)?;
        let mut account = account.lock();

        if let Err(e) = account.withdraw(amount) {
            warn!(error = %e, "Withdrawal rejected");
            return Err(e);
        }

        info!(balance = account.balance, "Withdrawal applied");
        Ok(AccountView::from(&*account))
    }

    /// Move funds between two accounts.
    ///
    /// Both records are locked for the whole operation, in ascending name
    /// order, so opposite-direction transfers cannot deadlock.
    #[instrument(skip(self))]
    pub fn transfer(&self, from: &str, to: &str, amount: f64) -> Result<TransferReceipt> {
        if from == to {
            warn!("Transfer to same account rejected");
            return Err(LedgerError::SameAccount(from.to_string()));
        }

        let source = self.store.lookup(from)?;
        let destination = self.store.lookup(to)?;

        let (mut source, mut destination) = if from < to {
            let source = source.lock();
            (source, destination.lock())
        } else {
            let destination = destination.lock();
            (source.lock(), destination)
        };

        if let Err(e) = account::transfer(&mut source, &mut destination, amount) {
            warn!(error = %e, "Transfer rejected");
            return Err(e);
        }

        info!(
            source_balance = source.balance,
            destination_balance = destination.balance,
            "Transfer applied"
        );

        Ok(TransferReceipt {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        })
    }

    /// Sum of every balance in the store.
    pub fn total_balance(&self) -> f64 {
        self.store
            .snapshot_all()
            .iter()
            .map(|account| account.balance)
            .sum()
    }

    /// Write every account to a snapshot file. Returns the number of accounts written.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn save(&self, path: &Path) -> Result<usize> {
        let accounts = self.store.snapshot_all();
        snapshot::save_to_path(path, &accounts)?;
        Ok(accounts.len())
    }

    /// Replace the store with the contents of a snapshot file.
    ///
    /// The file is parsed in full before the store changes, so a missing
    /// or malformed snapshot leaves the current accounts in place.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<usize> {
        let accounts = snapshot::load_from_path(path)?;
        let count = accounts.len();
        self.store.replace_all(accounts.into_values());
        debug!(accounts = count, "Store restored from snapshot");
        Ok(count)
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new(Arc::new(LedgerStore::new()))
    }
}
