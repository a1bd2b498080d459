use async_trait::async_trait;

use super::types::{GradeEntry, Submission};
use crate::CohortError;

/// Read access to submission records.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> Result<Option<Submission>, CohortError>;
}

/// The grading side effect: appends a grade once validation has passed.
///
/// Implementations live in the host application (a database table, an event
/// stream). Nothing is ever appended for a rejected operation.
#[async_trait]
pub trait GradeLedger: Send + Sync {
    async fn record(&self, entry: GradeEntry) -> Result<(), CohortError>;
}

// Shared handles satisfy the seams too, so a test can keep a clone of a mock
// while the rule or action owns the other.

#[async_trait]
impl<T: SubmissionRepository + ?Sized> SubmissionRepository for std::sync::Arc<T> {
    async fn find_by_id(&self, id: u64) -> Result<Option<Submission>, CohortError> {
        (**self).find_by_id(id).await
    }
}

#[async_trait]
impl<T: GradeLedger + ?Sized> GradeLedger for std::sync::Arc<T> {
    async fn record(&self, entry: GradeEntry) -> Result<(), CohortError> {
        (**self).record(entry).await
    }
}
