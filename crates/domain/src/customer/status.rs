//! Customer lifecycle status.

use serde::{Deserialize, Serialize};

/// The status of a customer.
///
/// ```text
/// Active ◄──► Inactive
///   │            │
///   └─────┬──────┘
///         ▼
///      Deleted (tombstone)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CustomerStatus {
    /// Registered customers start out active.
    #[default]
    Active,

    Inactive,

    /// Tombstoned. No further changes are accepted.
    Deleted,
}

impl CustomerStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, CustomerStatus::Active)
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, CustomerStatus::Deleted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "Active",
            CustomerStatus::Inactive => "Inactive",
            CustomerStatus::Deleted => "Deleted",
        }
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
