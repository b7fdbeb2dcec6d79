//! Fee schedules: what to bill, to whom, for which months.

use chrono::{Month, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::receivable::Student;

/// Number of monthly instalments a semester's tuition is split into.
const TUITION_INSTALMENTS: u32 = 6;

/// One monthly instalment of a semester fee, rounded to whole rupees.
#[must_use]
pub fn monthly_tuition(semester_fee: Decimal) -> Decimal {
    (semester_fee / Decimal::from(TUITION_INSTALMENTS)).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Fee head being billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeHead {
    /// Monthly tuition.
    Tuition,
    /// One-off admission fee.
    Admission,
    /// Registration fee.
    Registration,
    /// Examination fee.
    Exam,
    /// Fine.
    Fine,
    /// Anything else.
    Other,
}

impl FeeHead {
    /// Display label used in narratives.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tuition => "Tuition Fee",
            Self::Admission => "Admission Fee",
            Self::Registration => "Registration Fee",
            Self::Exam => "Exam Fee",
            Self::Fine => "Fine",
            Self::Other => "Other",
        }
    }

    /// Key the amount is stored under in a transaction's details.
    #[must_use]
    pub const fn detail_key(self) -> &'static str {
        match self {
            Self::Tuition => "tuition",
            Self::Admission => "admission",
            Self::Registration => "registration",
            Self::Exam => "exam",
            Self::Fine => "fine",
            Self::Other => "other",
        }
    }

    /// Parse a head from its label or key.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        let key = normalized.strip_suffix(" fee").unwrap_or(&normalized);
        match key {
            "tuition" => Some(Self::Tuition),
            "admission" => Some(Self::Admission),
            "registration" => Some(Self::Registration),
            "exam" => Some(Self::Exam),
            "fine" => Some(Self::Fine),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Eligibility filter. `None` matches every value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFilter {
    /// Programme of study.
    pub program: Option<String>,
    /// Semester label.
    pub semester: Option<String>,
    /// Campus.
    pub campus: Option<String>,
    /// Affiliating board.
    pub board: Option<String>,
}

impl StudentFilter {
    /// Returns true if `student` passes every set criterion.
    #[must_use]
    pub fn matches(&self, student: &Student) -> bool {
        fn field_matches(wanted: Option<&String>, actual: &str) -> bool {
            wanted.is_none_or(|wanted| wanted == actual)
        }
        field_matches(self.program.as_ref(), &student.program)
            && field_matches(self.semester.as_ref(), &student.semester)
            && field_matches(self.campus.as_ref(), &student.campus)
            && field_matches(self.board.as_ref(), &student.board)
    }
}

/// A billing run: one fee head over a span of months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    /// Head being billed.
    pub head: FeeHead,
    /// First billed month.
    pub month_from: Month,
    /// Last billed month. Earlier than `month_from` wraps into the next year.
    pub month_to: Month,
    /// Academic year shown in narratives.
    pub year: i32,
    /// Date the dues are posted on.
    pub posting_date: NaiveDate,
    /// Date the dues fall due.
    pub due_date: NaiveDate,
    /// Flat amount per student. Ignored unless positive.
    pub amount_override: Option<Decimal>,
    /// Who is billed.
    pub filter: StudentFilter,
}

impl FeeSchedule {
    /// Creates a schedule for every student with no override.
    #[must_use]
    pub fn new(head: FeeHead, month_from: Month, month_to: Month, year: i32, posting_date: NaiveDate) -> Self {
        Self {
            head,
            month_from,
            month_to,
            year,
            posting_date,
            due_date: posting_date,
            amount_override: None,
            filter: StudentFilter::default(),
        }
    }

    /// Number of months billed, inclusive, wrapping across year end.
    #[must_use]
    pub fn month_count(&self) -> u32 {
        let from = self.month_from.number_from_month();
        let to = self.month_to.number_from_month();
        if to >= from {
            to - from + 1
        } else {
            (12 - from) + to + 1
        }
    }

    /// Amount billed to one student.
    ///
    /// A positive override wins. Otherwise tuition is a rounded sixth of the
    /// semester fee per month, admission is the student's admission fee, and
    /// every other head is zero.
    #[must_use]
    pub fn amount_for(&self, student: &Student) -> Decimal {
        if let Some(amount) = self.amount_override.filter(|amount| *amount > Decimal::ZERO) {
            return amount;
        }
        match self.head {
            FeeHead::Tuition => monthly_tuition(student.tuition_fee) * Decimal::from(self.month_count()),
            FeeHead::Admission => student.admission_fee,
            FeeHead::Registration | FeeHead::Exam | FeeHead::Fine | FeeHead::Other => Decimal::ZERO,
        }
    }

    /// Narrative shared by every row, e.g. `"Tuition Fee for January to June 2024"`.
    #[must_use]
    pub fn narrative(&self) -> String {
        format!(
            "{} for {} to {} {}",
            self.head.label(),
            self.month_from.name(),
            self.month_to.name(),
            self.year
        )
    }

    /// Month span recorded in details, e.g. `"January-June"`.
    #[must_use]
    pub fn month_span(&self) -> String {
        format!("{}-{}", self.month_from.name(), self.month_to.name())
    }
}
