use chrono::Utc;
use serde_json::json;

use crate::grading::{GradeEntry, GradeLedger, SubmissionRepository};
use crate::locale::Localizer;
use crate::policy::{
    OperationInput, OwnersShouldBeActive, PolicyValidator, RuleParams, ValidationResult,
};
use crate::tenancy::MembershipRepository;
use crate::{CohortError, RuleFailure};

/// Input for grading a submission.
#[derive(Debug, Clone)]
pub struct GradeSubmissionInput {
    pub submission_id: u64,
    pub evaluator_id: u64,
    pub grade: i32,
}

/// Grades a submission, but only after every attached policy rule passes.
///
/// This action:
/// 1. Builds the operation's argument map
/// 2. Runs the validator with [`OwnersShouldBeActive`] attached
/// 3. On violations, localizes every message key and rejects without
///    touching the ledger
/// 4. On a clean pass, appends the grade to the ledger
///
/// There is no partial application: a rejected grade leaves no trace.
pub struct GradeSubmissionAction<L, G>
where
    L: Localizer,
    G: GradeLedger,
{
    validator: PolicyValidator,
    localizer: L,
    ledger: G,
}

impl<L, G> GradeSubmissionAction<L, G>
where
    L: Localizer,
    G: GradeLedger,
{
    /// Creates the action with the gradability rule attached.
    pub fn new<S, M>(submission_repo: S, membership_repo: M, localizer: L, ledger: G) -> Self
    where
        S: SubmissionRepository + 'static,
        M: MembershipRepository + 'static,
    {
        let validator = PolicyValidator::new().attach(
            OwnersShouldBeActive::new(submission_repo, membership_repo),
            RuleParams::new(),
        );

        Self {
            validator,
            localizer,
            ledger,
        }
    }

    /// Validates and records the grade.
    ///
    /// # Returns
    ///
    /// - `Ok(entry)` - All rules passed; the grade was appended to the ledger
    /// - `Err(CohortError::PolicyViolation(..))` - At least one rule failed;
    ///   every violation is reported with its localized message
    /// - `Err(CohortError::ReferenceNotFound { .. })` - The submission id
    ///   does not exist
    /// - `Err(_)` - Collaborator or ledger failures
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "grade_submission", skip(self), err)
    )]
    pub async fn execute(
        &self,
        input: GradeSubmissionInput,
        locale: &str,
    ) -> Result<GradeEntry, CohortError> {
        let mut arguments = OperationInput::new();
        arguments.insert("submission_id".to_owned(), json!(input.submission_id));
        arguments.insert("evaluator_id".to_owned(), json!(input.evaluator_id));
        arguments.insert("grade".to_owned(), json!(input.grade));

        match self.validator.validate(&arguments).await? {
            ValidationResult::Valid => {}
            ValidationResult::Invalid(violations) => {
                let failures: Vec<RuleFailure> = violations
                    .into_iter()
                    .map(|v| {
                        let message = self.localizer.translate(&v.message_key, locale);
                        RuleFailure {
                            rule: v.rule,
                            message_key: v.message_key,
                            message,
                        }
                    })
                    .collect();

                log::info!(
                    target: "cohort",
                    "msg=\"grading rejected by policy\", submission_id={}, violations={}",
                    input.submission_id,
                    failures.len()
                );
                return Err(CohortError::PolicyViolation(failures));
            }
        }

        let entry = GradeEntry {
            submission_id: input.submission_id,
            evaluator_id: input.evaluator_id,
            grade: input.grade,
            recorded_at: Utc::now(),
        };
        self.ledger.record(entry.clone()).await?;

        log::info!(
            target: "cohort",
            "msg=\"grade recorded\", submission_id={}, evaluator_id={}",
            entry.submission_id,
            entry.evaluator_id
        );

        Ok(entry)
    }
}
