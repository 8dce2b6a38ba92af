//! Bank Ledger Server
//!
//! HTTP surface over the ledger engine: account creation and lookup,
//! deposits, withdrawals, transfers, and snapshot save/load.

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use api::router;
pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;
