//! Fee generation error types.

use thiserror::Error;

/// Errors that can occur while building fee transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No student matches the eligibility filter.
    #[error("No students found for the selected criteria")]
    NoEligibleStudents,

    /// Every eligible student came out at zero.
    #[error("Total amount is 0, set a valid fee amount or override")]
    EmptyBatch,

    /// A receipt must collect something.
    #[error("Total amount must be greater than 0")]
    NonPositiveTotal,

    /// A fee component is negative.
    #[error("Fee component {0} cannot be negative")]
    NegativeComponent(String),

    /// A hospital fee needs the hospital it is paid for.
    #[error("A hospital name is required when a hospital fee is charged")]
    HospitalNameRequired,
}

impl GenerationError {
    /// Returns the error code for collaborators.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoEligibleStudents => "NO_ELIGIBLE_STUDENTS",
            Self::EmptyBatch => "EMPTY_BATCH",
            Self::NonPositiveTotal => "NON_POSITIVE_TOTAL",
            Self::NegativeComponent(_) => "NEGATIVE_COMPONENT",
            Self::HospitalNameRequired => "HOSPITAL_NAME_REQUIRED",
        }
    }
}

impl From<GenerationError> for gims_shared::AppError {
    fn from(err: GenerationError) -> Self {
        Self::Validation(err.to_string())
    }
}
