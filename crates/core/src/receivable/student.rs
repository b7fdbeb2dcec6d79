//! Students and the roster.

use std::collections::BTreeMap;

use gims_shared::types::StudentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerError;

/// Status of a student who has left the institute.
const LEFT_STATUS: &str = "Left Student";

/// An enrolled student (the subset the ledger needs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique admission number.
    pub admission_no: StudentId,
    /// Full name.
    pub name: String,
    /// Father's name, printed on receipts.
    #[serde(default)]
    pub father_name: String,
    /// Programme of study, e.g. `"BSN"`.
    #[serde(default)]
    pub program: String,
    /// Current semester label.
    #[serde(default)]
    pub semester: String,
    /// Campus name.
    #[serde(default)]
    pub campus: String,
    /// Affiliating board or university.
    #[serde(default)]
    pub board: String,
    /// Fee per semester, billed in monthly instalments.
    #[serde(default)]
    pub tuition_fee: Decimal,
    /// One-off admission fee.
    #[serde(default)]
    pub admission_fee: Decimal,
    /// Fee for the whole course, used for revenue projection.
    #[serde(default)]
    pub total_course_fee: Decimal,
    /// Enrollment status, e.g. `"Paid"`, `"Free"` or `"Left Student"`.
    #[serde(default)]
    pub status: String,
    /// Cached receivable. Positive means the student owes the institute.
    #[serde(default)]
    pub balance: Decimal,
}

impl Student {
    /// Creates a student with zero fees and a zero balance.
    #[must_use]
    pub fn new(admission_no: impl Into<StudentId>, name: impl Into<String>) -> Self {
        Self {
            admission_no: admission_no.into(),
            name: name.into(),
            father_name: String::new(),
            program: String::new(),
            semester: String::new(),
            campus: String::new(),
            board: String::new(),
            tuition_fee: Decimal::ZERO,
            admission_fee: Decimal::ZERO,
            total_course_fee: Decimal::ZERO,
            status: String::new(),
            balance: Decimal::ZERO,
        }
    }

    /// Returns true if the student has left the institute.
    #[must_use]
    pub fn has_left(&self) -> bool {
        self.status.eq_ignore_ascii_case(LEFT_STATUS)
    }
}

/// Students keyed by admission number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRoster {
    students: BTreeMap<StudentId, Student>,
}

impl StudentRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from persisted records. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_students(students: impl IntoIterator<Item = Student>) -> Self {
        Self {
            students: students
                .into_iter()
                .map(|student| (student.admission_no.clone(), student))
                .collect(),
        }
    }

    /// Adds or replaces a student, returning the previous record.
    pub fn upsert(&mut self, student: Student) -> Option<Student> {
        self.students.insert(student.admission_no.clone(), student)
    }

    /// Looks up a student.
    #[must_use]
    pub fn get(&self, id: &StudentId) -> Option<&Student> {
        self.students.get(id)
    }

    /// Looks up a student that must exist.
    ///
    /// # Errors
    ///
    /// Returns `StudentNotFound`.
    pub fn require(&self, id: &StudentId) -> Result<&Student, LedgerError> {
        self.get(id)
            .ok_or_else(|| LedgerError::StudentNotFound(id.clone()))
    }

    pub(crate) fn get_mut(&mut self, id: &StudentId) -> Option<&mut Student> {
        self.students.get_mut(id)
    }

    /// Returns true if the student exists.
    #[must_use]
    pub fn contains(&self, id: &StudentId) -> bool {
        self.students.contains_key(id)
    }

    /// Students ordered by admission number.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Student> {
        self.students.values_mut()
    }

    /// Number of students.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Returns true if there are no students.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Consumes the roster, returning students ordered by admission number.
    #[must_use]
    pub fn into_students(self) -> Vec<Student> {
        self.students.into_values().collect()
    }
}
