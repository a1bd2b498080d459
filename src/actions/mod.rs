//! Boundary operations guarded by the policy validator.

mod grade;

pub use grade::{GradeSubmissionAction, GradeSubmissionInput};
