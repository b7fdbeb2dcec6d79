//! User roles and the capability interface the engine consults.

use serde::{Deserialize, Serialize};

use crate::ledger::TransactionStatus;

/// What the engine needs to know about whoever performs an operation.
///
/// The role to permission mapping stays with the caller; the engine only
/// asks these questions.
pub trait Capability {
    /// Name recorded in the audit trail.
    fn actor_name(&self) -> &str;

    /// Returns true if the actor's entries are posted without review.
    fn can_post_directly(&self) -> bool;

    /// Returns true if the actor may approve, reject and confirm deletions.
    fn can_approve(&self) -> bool {
        self.can_post_directly()
    }

    /// Status a new entry from this actor starts in.
    fn initial_status(&self) -> TransactionStatus {
        if self.can_post_directly() {
            TransactionStatus::Posted
        } else {
            TransactionStatus::Pending
        }
    }
}

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Front desk. Records fee collections.
    Cashier,
    /// Records vouchers.
    Accountant,
    /// Approves and posts.
    #[serde(rename = "Finance Manager")]
    FinanceManager,
    /// Full access.
    Admin,
}

impl UserRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "cashier" => Some(Self::Cashier),
            "accountant" => Some(Self::Accountant),
            "finance manager" => Some(Self::FinanceManager),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the display name of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cashier => "Cashier",
            Self::Accountant => "Accountant",
            Self::FinanceManager => "Finance Manager",
            Self::Admin => "Admin",
        }
    }

    /// Returns true for roles trusted to post without review.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        matches!(self, Self::FinanceManager | Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named user acting in a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Login name.
    pub username: String,
    /// Assigned role.
    pub role: UserRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub fn new(username: impl Into<String>, role: UserRole) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

impl Capability for Actor {
    fn actor_name(&self) -> &str {
        &self.username
    }

    fn can_post_directly(&self) -> bool {
        self.role.is_privileged()
    }
}
