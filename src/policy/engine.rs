use async_trait::async_trait;
use futures::future::join_all;

use super::{OperationInput, RuleParams, ValidationResult, Violation};
use crate::CohortError;

/// A named, parameterized, side-effect-free check attached to an operation.
///
/// A rule inspects the operation's input and may perform read-only lookups
/// against collaborators. A violated condition yields the message key to
/// report; a satisfied condition yields `None`. Failures of the lookup
/// itself (missing referenced entity, unreachable collaborator) are errors,
/// not violations.
///
/// Rules must not depend on each other's execution: the validator is free to
/// evaluate them concurrently.
#[async_trait]
pub trait PolicyRule: Send + Sync {
    /// Stable rule name, used in violation reports.
    fn name(&self) -> &'static str;

    /// Evaluates the rule against the operation input.
    async fn check(
        &self,
        input: &OperationInput,
        params: &RuleParams,
    ) -> Result<Option<String>, CohortError>;
}

struct AttachedRule {
    rule: Box<dyn PolicyRule>,
    params: RuleParams,
}

/// Runs every rule attached to an operation and aggregates the violations.
///
/// Rules attach in declaration order and all of them always run, so a caller
/// gets the complete set of violated constraints in a single pass (a UI can
/// then display every failing constraint at once). Evaluation is concurrent;
/// the reported violation list is nevertheless in declaration order.
#[derive(Default)]
pub struct PolicyValidator {
    rules: Vec<AttachedRule>,
}

impl PolicyValidator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Attaches a rule with its parameter map. Order of attachment is the
    /// order violations are reported in.
    pub fn attach(mut self, rule: impl PolicyRule + 'static, params: RuleParams) -> Self {
        self.rules.push(AttachedRule {
            rule: Box::new(rule),
            params,
        });
        self
    }

    /// Number of attached rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs all attached rules against the input.
    ///
    /// Returns `Ok(Valid)` or `Ok(Invalid(..))` for policy outcomes;
    /// `Err(..)` only for caller or collaborator failures (a missing
    /// referenced entity, an unreachable store), which abort the whole
    /// validation.
    #[cfg_attr(feature = "tracing", tracing::instrument(name = "validate", skip_all, err))]
    pub async fn validate(
        &self,
        input: &OperationInput,
    ) -> Result<ValidationResult, CohortError> {
        let checks = self.rules.iter().map(|attached| async {
            let outcome = attached.rule.check(input, &attached.params).await?;
            Ok::<_, CohortError>((attached.rule.name(), outcome))
        });

        // join_all preserves input order, which keeps the report in
        // declaration order even though the checks run concurrently
        let outcomes = join_all(checks).await;

        let mut violations = Vec::new();
        for outcome in outcomes {
            let (rule, message_key) = outcome?;
            if let Some(message_key) = message_key {
                violations.push(Violation { rule, message_key });
            }
        }

        if violations.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            log::info!(
                target: "cohort",
                "msg=\"policy rules rejected operation\", violations={}",
                violations.len()
            );
            Ok(ValidationResult::Invalid(violations))
        }
    }
}
