//! Property-based tests for chart structure.
//!
//! **Property: Every account in a built chart satisfies level and parent rules**

use proptest::prelude::*;

use super::chart::ChartOfAccounts;
use super::types::{Account, AccountCategory, AccountLevel};

fn category_strategy() -> impl Strategy<Value = AccountCategory> {
    prop::sample::select(AccountCategory::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Randomly shaped but well-formed trees always build, and every
    /// non-root account references an existing parent one level up.
    #[test]
    fn prop_well_formed_tree_builds(
        root in 1u8..=9,
        category in category_strategy(),
        groups in 1usize..4,
        leaves in 1usize..5,
    ) {
        let mut accounts = vec![Account::new(root.to_string(), "Root", category, AccountLevel::Category)];
        for g in 1..=groups {
            let group = format!("{root}-{g:02}");
            for l in 1..=leaves {
                accounts.push(Account::new(format!("{group}-{l:03}"), "Leaf", category, AccountLevel::Posting));
            }
            accounts.push(Account::new(group, "Group", category, AccountLevel::Group));
        }

        let chart = ChartOfAccounts::from_accounts(accounts).unwrap();
        prop_assert_eq!(chart.len(), 1 + groups * (1 + leaves));
        prop_assert_eq!(chart.postable().count(), groups * leaves);

        for account in chart.iter() {
            prop_assert_eq!(account.code.depth(), account.level.depth());
            if let Some(parent_code) = &account.parent_code {
                let parent = chart.get(parent_code).unwrap();
                prop_assert_eq!(Some(parent.level), account.level.parent_level());
                prop_assert_eq!(parent.category, account.category);
            }
        }
    }

    /// A leaf whose group does not exist is never accepted.
    #[test]
    fn prop_orphan_leaf_rejected(group in 50u8..99) {
        let mut chart = ChartOfAccounts::institute_default();
        let orphan = Account::new(format!("1-{group}-001"), "Orphan", AccountCategory::Asset, AccountLevel::Posting);
        prop_assert!(chart.insert(orphan).is_err());
    }
}
