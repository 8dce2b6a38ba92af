//! Shared state handed to every request handler.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bankledger_ledger::LedgerEngine;

/// Handler state: the engine and where snapshots live.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<LedgerEngine>,
    snapshot_path: Arc<PathBuf>,
}

impl AppState {
    /// Create state over an engine.
    pub fn new(engine: Arc<LedgerEngine>, snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            snapshot_path: Arc::new(snapshot_path.into()),
        }
    }

    /// The ledger engine.
    pub fn engine(&self) -> &Arc<LedgerEngine> {
        &self.engine
    }

    /// Snapshot file location.
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}
