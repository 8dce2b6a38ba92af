//! Account records and the mutations applied to them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use bankledger_common::{checked_credit, validate_positive, AccountId, LedgerError, Result};

use crate::history::{HistoryEntry, HISTORY_DELIMITER};

/// A named balance holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// Display name, unique within a store.
    pub name: String,
    /// Current balance.
    pub balance: f64,
    /// Rendered history entries, oldest first.
    pub transactions: Vec<String>,
}

impl Account {
    /// Create a new account with a fresh identifier and empty history.
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self::with_id(AccountId::new(), name, balance, Vec::new())
    }

    /// Rebuild an account from persisted state.
    pub fn with_id(
        id: AccountId,
        name: impl Into<String>,
        balance: f64,
        transactions: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            transactions,
        }
    }

    /// Check if the account can cover a debit of `amount`.
    pub fn has_sufficient_funds(&self, amount: f64) -> bool {
        amount <= self.balance
    }

    /// Credit the account.
    pub fn deposit(&mut self, amount: f64) -> Result<()> {
        let amount = validate_positive(amount)?;
        self.balance = checked_credit(self.balance, amount)?;
        self.record(HistoryEntry::Deposit { amount });
        Ok(())
    }

    /// Debit the account. Fails without side effects if funds are short.
    pub fn withdraw(&mut self, amount: f64) -> Result<()> {
        let amount = validate_positive(amount)?;
        self.ensure_funds(amount)?;
        self.balance -= amount;
        self.record(HistoryEntry::Withdraw { amount });
        Ok(())
    }

    fn ensure_funds(&self, amount: f64) -> Result<()> {
        if !self.has_sufficient_funds(amount) {
            warn!(
                account = %self.name,
                requested = amount,
                available = self.balance,
                "Insufficient funds"
            );
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.transactions.push(entry.to_string());
    }
}

/// Move `amount` from `source` to `destination`.
///
/// Every precondition is checked before either balance changes, so a
/// failed transfer leaves both accounts untouched. Each side gains exactly
/// one history entry.
pub fn transfer(source: &mut Account, destination: &mut Account, amount: f64) -> Result<()> {
    let amount = validate_positive(amount)?;
    if source.name == destination.name {
        return Err(LedgerError::SameAccount(source.name.clone()));
    }
    source.ensure_funds(amount)?;
    let credited = checked_credit(destination.balance, amount)?;

    source.balance -= amount;
    destination.balance = credited;

    source.record(HistoryEntry::TransferOut {
        to: destination.name.clone(),
        amount,
    });
    destination.record(HistoryEntry::TransferIn {
        from: source.name.clone(),
        amount,
    });
    Ok(())
}

/// Check that a name can key a store entry and survive a snapshot.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(HISTORY_DELIMITER) {
        return Err(LedgerError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new("Alice", 100.0);
        assert_eq!(account.name, "Alice");
        assert_eq!(account.balance, 100.0);
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn test_deposit() {
        let mut account = Account::new("Alice", 100.0);
        account.deposit(50.0).unwrap();
        assert_eq!(account.balance, 150.0);
        assert_eq!(account.transactions, vec!["Deposit: 50"]);
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut account = Account::new("Alice", 100.0);
        assert_eq!(account.deposit(0.0), Err(LedgerError::InvalidAmount(0.0)));
        assert_eq!(
            account.deposit(-10.0),
            Err(LedgerError::InvalidAmount(-10.0))
        );
        assert_eq!(account.balance, 100.0);
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn test_deposit_rejects_overflow() {
        let mut account = Account::new("Alice", 0.0);
        account.deposit(1e308).unwrap();

        assert_eq!(account.deposit(1e308), Err(LedgerError::InvalidAmount(1e308)));
        assert_eq!(account.balance, 1e308);
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn test_withdraw() {
        let mut account = Account::new("Dave", 100.0);
        account.withdraw(50.0).unwrap();
        assert_eq!(account.balance, 50.0);
        assert_eq!(account.transactions, vec!["Withdraw: 50"]);
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = Account::new("Dave", 100.0);
        account.withdraw(100.0).unwrap();
        assert_eq!(account.balance, 0.0);
    }

    #[test]
    fn test_withdraw_insufficient_funds() {
        let mut account = Account::new("Eve", 100.0);
        let err = account.withdraw(150.0).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                requested: 150.0,
                available: 100.0
            }
        );
        assert_eq!(account.balance, 100.0);
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn test_withdraw_rejects_non_positive() {
        let mut account = Account::new("Dave", 100.0);
        assert!(account.withdraw(-50.0).is_err());
        assert!(account.withdraw(0.0).is_err());
        assert_eq!(account.balance, 100.0);
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn test_transfer() {
        let mut frank = Account::new("Frank", 100.0);
        let mut grace = Account::new("Grace", 100.0);

        transfer(&mut frank, &mut grace, 50.0).unwrap();

        assert_eq!(frank.balance, 50.0);
        assert_eq!(grace.balance, 150.0);
        assert_eq!(frank.transactions, vec!["Transfer to Grace: 50"]);
        assert_eq!(grace.transactions, vec!["Transfer from Frank: 50"]);
    }

    #[test]
    fn test_failed_transfer_touches_nothing() {
        let mut frank = Account::new("Frank", 50.0);
        let mut grace = Account::new("Grace", 100.0);

        assert!(transfer(&mut frank, &mut grace, 100.0).is_err());
        assert!(transfer(&mut frank, &mut grace, -50.0).is_err());
        assert!(transfer(&mut frank, &mut grace, f64::NAN).is_err());

        assert_eq!(frank.balance, 50.0);
        assert_eq!(grace.balance, 100.0);
        assert!(frank.transactions.is_empty());
        assert!(grace.transactions.is_empty());
    }

    #[test]
    fn test_transfer_rejects_credit_overflow() {
        let mut frank = Account::new("Frank", 1e308);
        let mut grace = Account::new("Grace", 1e308);

        assert_eq!(
            transfer(&mut frank, &mut grace, 1e308),
            Err(LedgerError::InvalidAmount(1e308))
        );
        assert_eq!(frank.balance, 1e308);
        assert_eq!(grace.balance, 1e308);
        assert!(frank.transactions.is_empty());
        assert!(grace.transactions.is_empty());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Alice").is_ok());
        assert!(validate_name("Mary Ann").is_ok());
        assert_eq!(
            validate_name(""),
            Err(LedgerError::InvalidName(String::new()))
        );
        assert!(validate_name("a;b").is_err());
    }
}
