use async_trait::async_trait;

use super::engine::PolicyRule;
use super::{OperationInput, RuleParams};
use crate::grading::SubmissionRepository;
use crate::tenancy::MembershipRepository;
use crate::CohortError;

/// Message key reported when a submission's owners are all inactive.
pub const OWNERS_SHOULD_BE_ACTIVE_ERROR: &str = "owners_should_be_active_error";

/// Parameter naming the input field that holds the submission id.
const SUBMISSION_ID_FIELD_PARAM: &str = "submission_id_field";
const DEFAULT_SUBMISSION_ID_FIELD: &str = "submission_id";

/// A submission may be graded only while at least one membership of its
/// owning unit is still active.
///
/// The check reads *current* membership state: a sole founder dropping out
/// after the submission was created blocks grading of that submission. A
/// unit with no memberships at all counts as "all inactive".
pub struct OwnersShouldBeActive<S, M>
where
    S: SubmissionRepository,
    M: MembershipRepository,
{
    submission_repo: S,
    membership_repo: M,
}

impl<S, M> OwnersShouldBeActive<S, M>
where
    S: SubmissionRepository,
    M: MembershipRepository,
{
    pub fn new(submission_repo: S, membership_repo: M) -> Self {
        Self {
            submission_repo,
            membership_repo,
        }
    }
}

#[async_trait]
impl<S, M> PolicyRule for OwnersShouldBeActive<S, M>
where
    S: SubmissionRepository,
    M: MembershipRepository,
{
    fn name(&self) -> &'static str {
        "owners_should_be_active"
    }

    async fn check(
        &self,
        input: &OperationInput,
        params: &RuleParams,
    ) -> Result<Option<String>, CohortError> {
        let field = params
            .get(SUBMISSION_ID_FIELD_PARAM)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SUBMISSION_ID_FIELD);

        let submission_id = input
            .get(field)
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| {
                CohortError::MalformedInput(format!("expected numeric argument '{field}'"))
            })?;

        let submission = self
            .submission_repo
            .find_by_id(submission_id)
            .await?
            .ok_or(CohortError::ReferenceNotFound {
                entity: "submission",
                id: submission_id,
            })?;

        let owners = self
            .membership_repo
            .find_by_unit(submission.organizational_unit_id)
            .await?;

        if owners.iter().any(|m| m.active) {
            Ok(None)
        } else {
            Ok(Some(OWNERS_SHOULD_BE_ACTIVE_ERROR.to_owned()))
        }
    }
}

#[cfg(all(test, feature = "mocks"))]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::grading::MockSubmissionRepository;
    use crate::policy::{PolicyValidator, ValidationResult};
    use crate::tenancy::MockMembershipRepository;

    fn input_for(submission_id: u64) -> OperationInput {
        let mut map = OperationInput::new();
        map.insert("submission_id".to_owned(), json!(submission_id));
        map
    }

    fn rule(
        submissions: &Arc<MockSubmissionRepository>,
        memberships: &Arc<MockMembershipRepository>,
    ) -> OwnersShouldBeActive<Arc<MockSubmissionRepository>, Arc<MockMembershipRepository>> {
        OwnersShouldBeActive::new(Arc::clone(submissions), Arc::clone(memberships))
    }

    #[tokio::test]
    async fn active_owner_passes() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        memberships.add_membership(1, 10, true).unwrap();
        memberships.add_membership(2, 10, false).unwrap();
        let submission = submissions.add_submission(10).unwrap();

        let validator =
            PolicyValidator::new().attach(rule(&submissions, &memberships), RuleParams::new());
        let result = validator.validate(&input_for(submission.id)).await.unwrap();
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn all_inactive_owners_violate() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        memberships.add_membership(1, 10, false).unwrap();
        let submission = submissions.add_submission(10).unwrap();

        let validator =
            PolicyValidator::new().attach(rule(&submissions, &memberships), RuleParams::new());
        let result = validator.validate(&input_for(submission.id)).await.unwrap();

        let ValidationResult::Invalid(violations) = result else {
            panic!("expected a violation");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "owners_should_be_active");
        assert_eq!(violations[0].message_key, OWNERS_SHOULD_BE_ACTIVE_ERROR);
    }

    #[tokio::test]
    async fn unit_without_members_violates() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        let submission = submissions.add_submission(99).unwrap();

        let validator =
            PolicyValidator::new().attach(rule(&submissions, &memberships), RuleParams::new());
        let result = validator.validate(&input_for(submission.id)).await.unwrap();
        assert!(!result.is_valid());
    }

    #[tokio::test]
    async fn missing_submission_is_reference_not_found() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        let validator =
            PolicyValidator::new().attach(rule(&submissions, &memberships), RuleParams::new());
        let err = validator.validate(&input_for(404)).await.unwrap_err();
        assert_eq!(
            err,
            CohortError::ReferenceNotFound {
                entity: "submission",
                id: 404
            }
        );
    }

    #[tokio::test]
    async fn missing_argument_is_malformed_input() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        let validator =
            PolicyValidator::new().attach(rule(&submissions, &memberships), RuleParams::new());
        let err = validator
            .validate(&OperationInput::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CohortError::MalformedInput(_)));
    }

    #[tokio::test]
    async fn field_name_is_configurable() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        memberships.add_membership(1, 10, true).unwrap();
        let submission = submissions.add_submission(10).unwrap();

        let mut params = RuleParams::new();
        params.insert(
            "submission_id_field".to_owned(),
            "timeline_event_id".to_owned(),
        );

        let mut input = OperationInput::new();
        input.insert("timeline_event_id".to_owned(), json!(submission.id));

        let validator = PolicyValidator::new().attach(rule(&submissions, &memberships), params);
        let result = validator.validate(&input).await.unwrap();
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn rule_is_idempotent_for_unchanged_state() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        memberships.add_membership(1, 10, false).unwrap();
        let submission = submissions.add_submission(10).unwrap();

        let validator =
            PolicyValidator::new().attach(rule(&submissions, &memberships), RuleParams::new());
        let first = validator.validate(&input_for(submission.id)).await.unwrap();
        let second = validator.validate(&input_for(submission.id)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unavailable_membership_store_is_not_a_violation() {
        let submissions = Arc::new(MockSubmissionRepository::new());
        let memberships = Arc::new(MockMembershipRepository::new());

        memberships.add_membership(1, 10, true).unwrap();
        let submission = submissions.add_submission(10).unwrap();
        memberships.set_unavailable(true);

        let validator =
            PolicyValidator::new().attach(rule(&submissions, &memberships), RuleParams::new());
        let err = validator.validate(&input_for(submission.id)).await.unwrap_err();
        assert!(matches!(err, CohortError::CollaboratorUnavailable(_)));
    }
}
