//! Incremental receivable cache and its recomputation oracle.

use std::collections::HashMap;

use gims_shared::types::{AccountCode, StudentId};
use rust_decimal::Decimal;
use serde::Serialize;

use super::student::{Student, StudentRoster};
use crate::balance::BalanceEngine;
use crate::ledger::{LedgerError, Transaction};

/// Whether a transaction's effect is being added or taken back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The transaction became effective.
    Apply,
    /// The transaction stopped being effective.
    Reverse,
}

impl Direction {
    /// `+1` or `-1`.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Apply => Decimal::ONE,
            Self::Reverse => Decimal::NEGATIVE_ONE,
        }
    }
}

/// A planned change to one student's cached balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAdjustment {
    /// Student to adjust.
    pub student_id: StudentId,
    /// Signed amount to add.
    pub delta: Decimal,
}

/// A student whose cached balance disagrees with the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceDrift {
    /// Affected student.
    pub student_id: StudentId,
    /// Balance held in the cache.
    pub cached: Decimal,
    /// Balance recomputed from the ledger.
    pub expected: Decimal,
}

impl BalanceDrift {
    /// `cached - expected`.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.cached - self.expected
    }
}

/// Maintains per-student receivable balances for one receivable account.
#[derive(Debug, Clone)]
pub struct ReceivableTracker {
    receivable_code: AccountCode,
}

impl ReceivableTracker {
    /// Creates a tracker watching `receivable_code`.
    #[must_use]
    pub fn new(receivable_code: AccountCode) -> Self {
        Self { receivable_code }
    }

    /// The watched account.
    #[must_use]
    pub fn receivable_code(&self) -> &AccountCode {
        &self.receivable_code
    }

    /// Signed change `txn` makes to its student's balance in `direction`.
    ///
    /// Debiting the receivable raises what the student owes; crediting it
    /// lowers it. Anything else has no effect.
    #[must_use]
    pub fn delta(&self, txn: &Transaction, direction: Direction) -> Decimal {
        BalanceEngine::contribution(txn, &self.receivable_code) * direction.sign()
    }

    /// Applies or reverses `txn` on `student`'s cached balance.
    pub fn apply_effect(&self, student: &mut Student, txn: &Transaction, direction: Direction) {
        student.balance += self.delta(txn, direction);
    }

    /// Works out the adjustment a transition would make without touching state.
    ///
    /// # Returns
    ///
    /// `None` when the transaction has no student or no receivable effect.
    ///
    /// # Errors
    ///
    /// Returns `StudentNotFound` if the transaction would change the balance
    /// of a student missing from the roster.
    pub fn plan(
        &self,
        roster: &StudentRoster,
        txn: &Transaction,
        direction: Direction,
    ) -> Result<Option<BalanceAdjustment>, LedgerError> {
        let Some(student_id) = &txn.student_id else {
            return Ok(None);
        };
        let delta = self.delta(txn, direction);
        if delta.is_zero() {
            return Ok(None);
        }
        roster.require(student_id)?;
        Ok(Some(BalanceAdjustment {
            student_id: student_id.clone(),
            delta,
        }))
    }

    /// Applies previously planned adjustments.
    ///
    /// Adjustments for unknown students are skipped; [`Self::plan`] never
    /// produces them.
    pub fn commit(&self, roster: &mut StudentRoster, adjustments: impl IntoIterator<Item = BalanceAdjustment>) {
        for adjustment in adjustments {
            if let Some(student) = roster.get_mut(&adjustment.student_id) {
                student.balance += adjustment.delta;
            }
        }
    }

    /// Recomputes one student's balance from scratch.
    pub fn recompute<'a>(
        &self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
        student_id: &StudentId,
    ) -> Decimal {
        transactions
            .into_iter()
            .filter(|txn| txn.is_effective() && txn.student_id.as_ref() == Some(student_id))
            .map(|txn| self.delta(txn, Direction::Apply))
            .sum()
    }

    fn recompute_all<'a>(
        &self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> HashMap<&'a StudentId, Decimal> {
        let mut expected: HashMap<&StudentId, Decimal> = HashMap::new();
        for txn in transactions {
            if !txn.is_effective() {
                continue;
            }
            if let Some(student_id) = &txn.student_id {
                *expected.entry(student_id).or_default() += self.delta(txn, Direction::Apply);
            }
        }
        expected
    }

    /// Lists students whose cached balance disagrees with the ledger.
    pub fn reconcile<'a>(
        &self,
        roster: &StudentRoster,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Vec<BalanceDrift> {
        let expected = self.recompute_all(transactions);
        roster
            .iter()
            .filter_map(|student| {
                let should_be = expected
                    .get(&student.admission_no)
                    .copied()
                    .unwrap_or_default();
                (student.balance != should_be).then(|| BalanceDrift {
                    student_id: student.admission_no.clone(),
                    cached: student.balance,
                    expected: should_be,
                })
            })
            .collect()
    }

    /// Resets every cached balance from the ledger, returning what was fixed.
    pub fn rebuild<'a>(
        &self,
        roster: &mut StudentRoster,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Vec<BalanceDrift> {
        let expected = self.recompute_all(transactions);
        let mut fixed = Vec::new();
        for student in roster.iter_mut() {
            let should_be = expected
                .get(&student.admission_no)
                .copied()
                .unwrap_or_default();
            if student.balance != should_be {
                fixed.push(BalanceDrift {
                    student_id: student.admission_no.clone(),
                    cached: student.balance,
                    expected: should_be,
                });
                student.balance = should_be;
            }
        }
        fixed
    }
}
