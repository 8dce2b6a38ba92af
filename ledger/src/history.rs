//! Transaction history entries.

use std::fmt;

use bankledger_common::format_amount;

/// Separator between history entries in a snapshot row.
pub const HISTORY_DELIMITER: &str = ";";

/// One completed mutation, as recorded in an account's history.
///
/// Accounts store the rendered text; this type only exists so every
/// entry is produced in the same shape.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// Funds credited to the account.
    Deposit { amount: f64 },
    /// Funds debited from the account.
    Withdraw { amount: f64 },
    /// Debit leg of a transfer, naming the recipient.
    TransferOut { to: String, amount: f64 },
    /// Credit leg of a transfer, naming the sender.
    TransferIn { from: String, amount: f64 },
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryEntry::Deposit { amount } => write!(f, "Deposit: {}", format_amount(*amount)),
            HistoryEntry::Withdraw { amount } => {
                write!(f, "Withdraw: {}", format_amount(*amount))
            }
            HistoryEntry::TransferOut { to, amount } => {
                write!(f, "Transfer to {}: {}", to, format_amount(*amount))
            }
            HistoryEntry::TransferIn { from, amount } => {
                write!(f, "Transfer from {}: {}", from, format_amount(*amount))
            }
        }
    }
}

/// Join history entries into a single snapshot field.
pub fn join_history(entries: &[String]) -> String {
    entries.join(HISTORY_DELIMITER)
}

/// Split a snapshot field back into history entries. An empty field is an empty history.
pub fn split_history(field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(HISTORY_DELIMITER).map(str::to_string).collect()
}
