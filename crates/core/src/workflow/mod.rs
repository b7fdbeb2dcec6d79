//! Approval workflow for transaction lifecycle management.
//!
//! This module provides:
//! - Actor roles and the capability check that picks an initial status
//! - A stateless state machine validating every status transition
//! - The balance effect each transition has on student receivables
//! - An append-only audit trail

pub mod audit;
pub mod error;
pub mod roles;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use error::WorkflowError;
pub use roles::{Actor, Capability, UserRole};
pub use service::WorkflowService;
pub use types::{BalanceEffect, WorkflowAction};
