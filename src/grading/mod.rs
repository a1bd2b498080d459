//! Submissions and the grade ledger.

mod repository;
mod types;

pub use repository::{GradeLedger, SubmissionRepository};
pub use types::{GradeEntry, Submission};

#[cfg(feature = "mocks")]
mod mocks;

#[cfg(feature = "mocks")]
pub use mocks::{MockGradeLedger, MockSubmissionRepository};
