use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{GradeLedger, SubmissionRepository};
use super::types::{GradeEntry, Submission};
use crate::CohortError;

pub struct MockSubmissionRepository {
    submissions: RwLock<HashMap<u64, Submission>>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
}

impl MockSubmissionRepository {
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Test helper: make every lookup fail with `CollaboratorUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Test helper: insert a submission for the given unit and return it.
    pub fn add_submission(&self, organizational_unit_id: u64) -> Result<Submission, CohortError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let submission = Submission {
            id,
            organizational_unit_id,
            created_at: Utc::now(),
        };

        let mut submissions = self
            .submissions
            .write()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        submissions.insert(id, submission.clone());

        Ok(submission)
    }
}

impl Default for MockSubmissionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionRepository for MockSubmissionRepository {
    async fn find_by_id(&self, id: u64) -> Result<Option<Submission>, CohortError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CohortError::CollaboratorUnavailable(
                "submission store unreachable".into(),
            ));
        }

        let submissions = self
            .submissions
            .read()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        Ok(submissions.get(&id).cloned())
    }
}

/// In-memory grade ledger that records entries for later assertion.
pub struct MockGradeLedger {
    entries: RwLock<Vec<GradeEntry>>,
}

impl MockGradeLedger {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Test helper: everything recorded so far, in order.
    pub fn entries(&self) -> Result<Vec<GradeEntry>, CohortError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        Ok(entries.clone())
    }
}

impl Default for MockGradeLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GradeLedger for MockGradeLedger {
    async fn record(&self, entry: GradeEntry) -> Result<(), CohortError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        entries.push(entry);
        Ok(())
    }
}
