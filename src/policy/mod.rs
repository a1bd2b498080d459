//! Declarative policy validation.
//!
//! Operations declare, as ordinary data, which named rules guard them; the
//! [`PolicyValidator`] looks the rules up, runs every one of them, and
//! reports the complete set of violations in one pass. Rules deal only in
//! stable message keys; turning a key into display text is the
//! [`Localizer`](crate::locale::Localizer) collaborator's job.

mod engine;
mod rules;

pub use engine::{PolicyRule, PolicyValidator};
pub use rules::{OwnersShouldBeActive, OWNERS_SHOULD_BE_ACTIVE_ERROR};

/// The argument set of the operation under validation, keyed by argument
/// name. Mirrors the declarative argument map of a transport-layer mutation.
pub type OperationInput = serde_json::Map<String, serde_json::Value>;

/// Per-attachment rule configuration with recognized string options (e.g.
/// which input field holds the submission id).
pub type RuleParams = std::collections::BTreeMap<String, String>;

/// One violated rule: the rule's name plus the message key it selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the violated rule.
    pub rule: &'static str,
    /// Stable message key; localization happens at the boundary.
    pub message_key: String,
}

/// Outcome of running every rule attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Every attached rule passed; the operation may proceed.
    Valid,
    /// At least one rule failed. Violations are in rule declaration order
    /// and the list is complete, never truncated to the first failure.
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The violations, empty when valid.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(violations) => violations,
        }
    }
}
