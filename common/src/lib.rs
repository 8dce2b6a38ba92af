//! Bank Ledger Common Types
//!
//! Shared types used across the ledger crates: account identifiers,
//! amount validation and formatting, and the error type every ledger
//! operation reports.

pub mod amount;
pub mod error;
pub mod identifiers;

pub use amount::*;
pub use error::*;
pub use identifiers::*;
