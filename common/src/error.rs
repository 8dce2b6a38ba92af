//! Error types for ledger operations.

use thiserror::Error;

/// Main error type for ledger operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// An account with this name already exists.
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    /// No account with this name.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Amount is not a finite positive number (or, for an opening balance, is negative).
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// Withdrawal or transfer larger than the available balance.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    /// Account name is empty or contains the history delimiter.
    #[error("Invalid account name: {0:?}")]
    InvalidName(String),

    /// Transfer source and destination are the same account.
    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(String),

    /// No snapshot at the given location. The path is kept for logs only.
    #[error("No saved state found")]
    SnapshotNotFound(String),

    /// A snapshot row is missing fields or holds unparseable values.
    #[error("Malformed snapshot record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    /// Snapshot read or write failed for a reason other than absence.
    #[error("Snapshot I/O error: {0}")]
    Io(String),
}

impl LedgerError {
    /// Get a stable error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::InvalidName(_) => "INVALID_NAME",
            LedgerError::SameAccount(_) => "SAME_ACCOUNT",
            LedgerError::SnapshotNotFound(_) => "SNAPSHOT_NOT_FOUND",
            LedgerError::MalformedRecord { .. } => "MALFORMED_RECORD",
            LedgerError::Io(_) => "IO_ERROR",
        }
    }

    /// Check if the error was caused by the caller's input rather than the environment.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LedgerError::Io(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
