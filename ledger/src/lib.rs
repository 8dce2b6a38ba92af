//! Bank Ledger Engine
//!
//! In-memory account ledger with per-account locking, deposit, withdraw
//! and transfer mutations, and a CSV snapshot codec for save/load.

pub mod account;
pub mod engine;
pub mod history;
pub mod snapshot;
pub mod store;

pub use account::Account;
pub use engine::{AccountView, LedgerEngine, TransferReceipt};
pub use history::HistoryEntry;
pub use store::{LedgerStore, SharedAccount};
