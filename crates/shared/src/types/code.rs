//! String keys shared by the ledger and its collaborators.
//!
//! Account codes are hierarchical (`"1"`, `"1-01"`, `"1-01-004"`), one
//! dash-separated segment per level. Student ids are admission numbers.

use serde::{Deserialize, Serialize};

const SEGMENT_SEPARATOR: char = '-';

/// Hierarchical chart of accounts code, e.g. `"1-01-004"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountCode(String);

impl AccountCode {
    /// Creates a code from its string form.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of segments in the code. Matches the account level for a well-formed chart.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        self.0.split(SEGMENT_SEPARATOR).count()
    }

    /// Code of the parent account, derived by dropping the last segment.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once(SEGMENT_SEPARATOR)
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// First segment of the code (the level-1 root it belongs to).
    #[must_use]
    pub fn root(&self) -> &str {
        self.0
            .split(SEGMENT_SEPARATOR)
            .next()
            .unwrap_or_default()
    }

    /// Returns true if `self` is `other` or sits underneath it.
    #[must_use]
    pub fn is_within(&self, other: &Self) -> bool {
        self == other
            || self
                .0
                .strip_prefix(other.as_str())
                .is_some_and(|rest| rest.starts_with(SEGMENT_SEPARATOR))
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Student admission number, e.g. `"KMU-24-001"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Creates a student id from an admission number.
    #[must_use]
    pub fn new(admission_no: impl Into<String>) -> Self {
        Self(admission_no.into())
    }

    /// Returns the admission number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StudentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", 1)]
    #[case("1-01", 2)]
    #[case("1-01-004", 3)]
    #[case("", 0)]
    fn test_account_code_depth(#[case] code: &str, #[case] depth: usize) {
        assert_eq!(AccountCode::new(code).depth(), depth);
    }

    #[test]
    fn test_account_code_parent() {
        assert_eq!(
            AccountCode::new("1-01-004").parent(),
            Some(AccountCode::new("1-01"))
        );
        assert_eq!(AccountCode::new("1-01").parent(), Some(AccountCode::new("1")));
        assert_eq!(AccountCode::new("1").parent(), None);
    }

    #[test]
    fn test_account_code_root() {
        assert_eq!(AccountCode::new("4-01-001").root(), "4");
        assert_eq!(AccountCode::new("5").root(), "5");
    }

    #[test]
    fn test_account_code_is_within() {
        let leaf = AccountCode::new("1-01-004");
        assert!(leaf.is_within(&AccountCode::new("1")));
        assert!(leaf.is_within(&AccountCode::new("1-01")));
        assert!(leaf.is_within(&leaf));
        assert!(!leaf.is_within(&AccountCode::new("1-0")));
        assert!(!AccountCode::new("11-01").is_within(&AccountCode::new("1")));
    }

    #[test]
    fn test_codes_serialize_as_plain_strings() {
        let json = serde_json::to_string(&AccountCode::new("1-01-004")).unwrap();
        assert_eq!(json, "\"1-01-004\"");
        let id: StudentId = serde_json::from_str("\"KMU-24-001\"").unwrap();
        assert_eq!(id.as_str(), "KMU-24-001");
    }
}
