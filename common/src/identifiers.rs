//! Identifier types for ledger entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an account.
///
/// Opaque to callers and immutable once assigned. Snapshots carry it
/// verbatim so a restored account keeps the identifier it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_creation() {
        let id1 = AccountId::new();
        let id2 = AccountId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_account_id_parse() {
        let uuid_str = "6f1c2a9e-0b7d-4c1e-9a55-3d2f8e4b7c10";
        let id = AccountId::parse(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn test_account_id_parse_rejects_garbage() {
        assert!(AccountId::parse("not-a-uuid").is_err());
        assert!(AccountId::parse("").is_err());
    }

    #[test]
    fn test_account_id_total_order() {
        let low = AccountId::parse("00000000-0000-4000-8000-000000000001").unwrap();
        let high = AccountId::parse("ffffffff-0000-4000-8000-000000000001").unwrap();
        assert!(low < high);
        assert_eq!(low.cmp(&low), std::cmp::Ordering::Equal);
    }
}
