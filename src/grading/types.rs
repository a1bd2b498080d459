//! Records for gradable work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work produced by an organizational unit (a "timeline event").
///
/// Its owners are the unit's memberships, looked up at validation time:
/// gradability tracks the owners' *current* status, not their status when
/// the submission was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier.
    pub id: u64,
    /// The organizational unit that produced the submission.
    pub organizational_unit_id: u64,
    /// When the submission was created.
    pub created_at: DateTime<Utc>,
}

/// One recorded grade, appended to the [`GradeLedger`](super::GradeLedger)
/// once every policy rule has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeEntry {
    /// The graded submission.
    pub submission_id: u64,
    /// Who graded it.
    pub evaluator_id: u64,
    /// The grade awarded.
    pub grade: i32,
    /// When the grade was recorded.
    pub recorded_at: DateTime<Utc>,
}
