//! The chart of accounts and its structural rules.

use std::collections::BTreeMap;

use gims_shared::types::AccountCode;

use super::error::AccountError;
use super::types::{Account, AccountCategory, AccountLevel};

/// Validated three-level chart of accounts, ordered by code.
///
/// Invariants held by every instance:
/// - codes are unique
/// - a code has exactly as many segments as its level
/// - every level 2/3 account has a parent one level up in the same category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<AccountCode, Account>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a chart from an unordered list of accounts.
    ///
    /// Parents are inserted before their children regardless of input order.
    ///
    /// # Errors
    ///
    /// Returns the first structural violation found.
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Result<Self, AccountError> {
        let mut accounts: Vec<Account> = accounts.into_iter().collect();
        accounts.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.code.cmp(&b.code)));

        let mut chart = Self::new();
        for account in accounts {
            chart.insert(account)?;
        }
        Ok(chart)
    }

    /// The chart every new book starts with.
    #[must_use]
    pub fn institute_default() -> Self {
        use AccountCategory::{Asset, Equity, Expense, Income, Liability};
        use AccountLevel::{Category, Group, Posting};

        let seed = [
            ("1", "Assets", Asset, Category),
            ("1-01", "Current Assets", Asset, Group),
            ("1-01-001", "Cash in Hand", Asset, Posting),
            ("1-01-002", "Bank Alfalah", Asset, Posting),
            ("1-01-003", "Bank Khyber", Asset, Posting),
            ("1-01-004", "Accounts Receivable", Asset, Posting),
            ("1-02", "Fixed Assets", Asset, Group),
            ("1-02-001", "Furniture & Fixtures", Asset, Posting),
            ("2", "Liabilities", Liability, Category),
            ("2-01", "Current Liabilities", Liability, Group),
            ("2-01-001", "Accounts Payable", Liability, Posting),
            ("3", "Equity", Equity, Category),
            ("3-01", "Capital", Equity, Group),
            ("3-01-001", "General Fund", Equity, Posting),
            ("4", "Income", Income, Category),
            ("4-01", "Academic Income", Income, Group),
            ("4-01-001", "Fee Income", Income, Posting),
            ("4-01-002", "Admission Fees", Income, Posting),
            ("5", "Expenses", Expense, Category),
            ("5-01", "Operational Expenses", Expense, Group),
            ("5-01-001", "Salaries Expense", Expense, Posting),
            ("5-01-003", "Utilities", Expense, Posting),
        ];

        let accounts = seed
            .into_iter()
            .map(|(code, name, category, level)| (AccountCode::new(code), Account::new(code, name, category, level)))
            .collect();
        Self { accounts }
    }

    /// Adds an account after checking it against the chart's rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken, malformed for its level, or
    /// its parent is missing or incompatible.
    pub fn insert(&mut self, account: Account) -> Result<(), AccountError> {
        if self.accounts.contains_key(&account.code) {
            return Err(AccountError::DuplicateCode(account.code));
        }
        self.check_structure(&account)?;
        self.accounts.insert(account.code.clone(), account);
        Ok(())
    }

    fn check_structure(&self, account: &Account) -> Result<(), AccountError> {
        let segments = account.code.depth();
        if segments != account.level.depth() {
            return Err(AccountError::LevelMismatch {
                code: account.code.clone(),
                level: account.level.depth(),
                segments,
            });
        }

        let Some(parent_level) = account.level.parent_level() else {
            return match account.parent_code {
                None => Ok(()),
                Some(_) => Err(AccountError::InvalidParent(account.code.clone())),
            };
        };

        let parent_code = match &account.parent_code {
            Some(parent) if Some(parent) == account.code.parent().as_ref() => parent,
            _ => return Err(AccountError::InvalidParent(account.code.clone())),
        };

        let parent = self
            .accounts
            .get(parent_code)
            .ok_or_else(|| AccountError::ParentNotFound {
                code: account.code.clone(),
                parent: parent_code.clone(),
            })?;

        if parent.level != parent_level || parent.category != account.category {
            return Err(AccountError::IncompatibleParent {
                code: account.code.clone(),
                parent: parent_code.clone(),
            });
        }
        Ok(())
    }

    /// Looks up an account by code.
    #[must_use]
    pub fn get(&self, code: &AccountCode) -> Option<&Account> {
        self.accounts.get(code)
    }

    /// Looks up an account that transactions may reference.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `NotPostable`.
    pub fn require_postable(&self, code: &AccountCode) -> Result<&Account, AccountError> {
        let account = self
            .get(code)
            .ok_or_else(|| AccountError::AccountNotFound(code.clone()))?;
        if !account.is_postable() {
            return Err(AccountError::NotPostable(code.clone()));
        }
        Ok(account)
    }

    /// Category of the account with this code.
    #[must_use]
    pub fn category_of(&self, code: &AccountCode) -> Option<AccountCategory> {
        self.get(code).map(|account| account.category)
    }

    /// All accounts in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Postable (level-3) accounts in code order.
    pub fn postable(&self) -> impl Iterator<Item = &Account> {
        self.iter().filter(|account| account.is_postable())
    }

    /// Postable accounts belonging to one category.
    pub fn postable_in(&self, category: AccountCategory) -> impl Iterator<Item = &Account> {
        self.postable().filter(move |account| account.category == category)
    }

    /// Direct children of an account.
    pub fn children<'a>(&'a self, code: &'a AccountCode) -> impl Iterator<Item = &'a Account> + 'a {
        self.iter()
            .filter(move |account| account.parent_code.as_ref() == Some(code))
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Consumes the chart, returning accounts in code order.
    #[must_use]
    pub fn into_accounts(self) -> Vec<Account> {
        self.accounts.into_values().collect()
    }
}
