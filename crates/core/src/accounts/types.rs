//! Account domain types.

use gims_shared::types::AccountCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level account category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountCategory {
    /// Things the institute owns (cash, banks, receivables).
    Asset,
    /// Amounts the institute owes.
    Liability,
    /// Owner's funds.
    Equity,
    /// Fees and other earnings.
    Income,
    /// Operating costs.
    Expense,
}

impl AccountCategory {
    /// All categories in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Income,
        Self::Expense,
    ];

    /// Returns the side on which this category's balance naturally grows.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Income => NormalBalance::Credit,
        }
    }

    /// Returns the category as its stored string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the ledger increases an account.
///
/// - Debit-normal: Asset, Expense. Debits increase, credits decrease.
/// - Credit-normal: Liability, Equity, Income. Credits increase, debits decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalBalance {
    /// Balance grows with debits.
    Debit,
    /// Balance grows with credits.
    Credit,
}

impl NormalBalance {
    /// Converts a raw `debit - credit` figure into a figure that is positive
    /// when the account holds its normal balance.
    #[must_use]
    pub fn present(self, raw: Decimal) -> Decimal {
        match self {
            Self::Debit => raw,
            Self::Credit => -raw,
        }
    }

    /// Calculates the balance change for the given debit and credit amounts.
    #[must_use]
    pub fn change(self, debit: Decimal, credit: Decimal) -> Decimal {
        self.present(debit - credit)
    }
}

/// Position of an account in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccountLevel {
    /// Category heading, e.g. `1 Assets`.
    Category,
    /// Group heading, e.g. `1-01 Current Assets`.
    Group,
    /// Postable account, e.g. `1-01-001 Cash in Hand`.
    Posting,
}

impl AccountLevel {
    /// Numeric level (1, 2 or 3).
    #[must_use]
    pub const fn depth(self) -> usize {
        match self {
            Self::Category => 1,
            Self::Group => 2,
            Self::Posting => 3,
        }
    }

    /// The level directly above this one, if any.
    #[must_use]
    pub const fn parent_level(self) -> Option<Self> {
        match self {
            Self::Category => None,
            Self::Group => Some(Self::Category),
            Self::Posting => Some(Self::Group),
        }
    }
}

impl TryFrom<u8> for AccountLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Category),
            2 => Ok(Self::Group),
            3 => Ok(Self::Posting),
            other => Err(format!("account level must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<AccountLevel> for u8 {
    fn from(level: AccountLevel) -> Self {
        match level {
            AccountLevel::Category => 1,
            AccountLevel::Group => 2,
            AccountLevel::Posting => 3,
        }
    }
}

/// A node in the chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Hierarchical code, unique within the chart.
    pub code: AccountCode,
    /// Display name.
    pub name: String,
    /// Top-level category, inherited from the root.
    #[serde(rename = "type")]
    pub category: AccountCategory,
    /// Position in the hierarchy.
    pub level: AccountLevel,
    /// Parent code. `None` only for level-1 accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<AccountCode>,
}

impl Account {
    /// Creates an account, deriving the parent code from the account code.
    #[must_use]
    pub fn new(
        code: impl Into<AccountCode>,
        name: impl Into<String>,
        category: AccountCategory,
        level: AccountLevel,
    ) -> Self {
        let code = code.into();
        let parent_code = match level {
            AccountLevel::Category => None,
            AccountLevel::Group | AccountLevel::Posting => code.parent(),
        };
        Self {
            code,
            name: name.into(),
            category,
            level,
            parent_code,
        }
    }

    /// Returns true if transactions may reference this account.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        self.level == AccountLevel::Posting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(AccountCategory::Asset, NormalBalance::Debit)]
    #[case(AccountCategory::Expense, NormalBalance::Debit)]
    #[case(AccountCategory::Liability, NormalBalance::Credit)]
    #[case(AccountCategory::Equity, NormalBalance::Credit)]
    #[case(AccountCategory::Income, NormalBalance::Credit)]
    fn test_normal_balance_table(#[case] category: AccountCategory, #[case] side: NormalBalance) {
        assert_eq!(category.normal_balance(), side);
    }

    #[test]
    fn test_present_flips_credit_normal() {
        assert_eq!(NormalBalance::Debit.present(dec!(150)), dec!(150));
        assert_eq!(NormalBalance::Credit.present(dec!(-150)), dec!(150));
    }

    #[test]
    fn test_change() {
        assert_eq!(NormalBalance::Debit.change(dec!(100), dec!(30)), dec!(70));
        assert_eq!(NormalBalance::Credit.change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_account_new_derives_parent() {
        let account = Account::new(
            "1-01-004",
            "Accounts Receivable",
            AccountCategory::Asset,
            AccountLevel::Posting,
        );
        assert_eq!(account.parent_code, Some(AccountCode::new("1-01")));
        assert!(account.is_postable());

        let root = Account::new("1", "Assets", AccountCategory::Asset, AccountLevel::Category);
        assert_eq!(root.parent_code, None);
        assert!(!root.is_postable());
    }

    #[test]
    fn test_level_serializes_as_number() {
        assert_eq!(serde_json::to_string(&AccountLevel::Group).unwrap(), "2");
        let level: AccountLevel = serde_json::from_str("3").unwrap();
        assert_eq!(level, AccountLevel::Posting);
        assert!(serde_json::from_str::<AccountLevel>("4").is_err());
    }

    #[test]
    fn test_account_serializes_with_type_field() {
        let account = Account::new("4-01", "Academic Income", AccountCategory::Income, AccountLevel::Group);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "Income");
        assert_eq!(json["parentCode"], "4");
        assert_eq!(json["level"], 2);
    }
}
