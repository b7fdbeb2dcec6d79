//! Append-only audit trail.

use chrono::{DateTime, Utc};
use gims_shared::types::AuditEntryId;
use serde::{Deserialize, Serialize};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Transaction recorded.
    Create,
    /// Draft submitted.
    Submit,
    /// Pending or rejected transaction posted.
    Approve,
    /// Pending transaction rejected.
    Reject,
    /// Deletion requested.
    DeleteRequest,
    /// Deletion request withdrawn.
    CancelDelete,
    /// Transaction permanently removed.
    Delete,
    /// Fields changed.
    Edit,
    /// Fee batch generated.
    BulkGenerate,
}

/// One audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Entry id.
    pub id: AuditEntryId,
    /// Voucher number, transaction id or batch id the entry refers to.
    pub ref_id: String,
    /// What happened.
    pub action: AuditAction,
    /// Who did it.
    pub user: String,
    /// When it happened.
    pub date: DateTime<Utc>,
    /// Free-text detail, e.g. `"Amount: 100 -> 150"`.
    #[serde(default)]
    pub extra_info: String,
}

/// Append-only list of audit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a persisted log.
    #[must_use]
    pub fn from_entries(entries: Vec<AuditEntry>) -> Self {
        Self { entries }
    }

    /// Appends an entry stamped with the current time.
    pub fn record(
        &mut self,
        action: AuditAction,
        ref_id: impl Into<String>,
        user: impl Into<String>,
        extra_info: impl Into<String>,
    ) -> &AuditEntry {
        self.record_at(action, ref_id, user, extra_info, Utc::now())
    }

    /// Appends an entry with an explicit timestamp.
    pub fn record_at(
        &mut self,
        action: AuditAction,
        ref_id: impl Into<String>,
        user: impl Into<String>,
        extra_info: impl Into<String>,
        date: DateTime<Utc>,
    ) -> &AuditEntry {
        let index = self.entries.len();
        self.entries.push(AuditEntry {
            id: AuditEntryId::new(),
            ref_id: ref_id.into(),
            action,
            user: user.into(),
            date,
            extra_info: extra_info.into(),
        });
        &self.entries[index]
    }

    /// Entries in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries referring to one voucher or id.
    pub fn for_reference<'a>(&'a self, ref_id: &'a str) -> impl Iterator<Item = &'a AuditEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.ref_id == ref_id)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the log, returning entries for persistence.
    #[must_use]
    pub fn into_entries(self) -> Vec<AuditEntry> {
        self.entries
    }
}
