//! Membership context resolution and pre-mutation policy validation for
//! multi-tenant platforms.
//!
//! A user may hold memberships in several organizational units, each unit
//! belonging to a tenant. This crate answers two questions for a host
//! application:
//!
//! - which tenants can a user reach, and which one is their active context
//!   ([`ContextResolver`])
//! - is a mutation allowed to proceed, according to the policy rules attached
//!   to it ([`PolicyValidator`], [`OwnersShouldBeActive`])
//!
//! Persistence, transport, and rendering stay behind traits; in-memory mock
//! implementations are available behind the `mocks` feature.

use std::fmt;

pub mod actions;
pub mod config;
pub mod grading;
pub mod locale;
pub mod policy;
pub mod tenancy;

pub use actions::{GradeSubmissionAction, GradeSubmissionInput};
pub use config::{AmbiguityPolicy, ResolverConfig};
pub use grading::{GradeEntry, GradeLedger, Submission, SubmissionRepository};
pub use locale::Localizer;
pub use policy::{
    OperationInput, OwnersShouldBeActive, PolicyRule, PolicyValidator, RuleParams,
    ValidationResult, Violation,
};
pub use tenancy::{
    ActiveContextRecord, ActiveContextRepository, ContextResolver, Membership,
    MembershipRepository, OrganizationalUnit, OrganizationalUnitRepository, Tenant,
    TenantRepository,
};

#[cfg(feature = "mocks")]
pub use grading::{MockGradeLedger, MockSubmissionRepository};
#[cfg(feature = "mocks")]
pub use locale::StaticCatalog;
#[cfg(feature = "mocks")]
pub use tenancy::{
    MockActiveContextRepository, MockMembershipRepository, MockOrganizationalUnitRepository,
    MockTenantRepository,
};

/// A single failed policy rule, as reported to the caller of a guarded
/// operation. Carries both the stable message key and the localized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    /// Name of the rule that failed.
    pub rule: &'static str,
    /// Stable message key, suitable for re-translation by the caller.
    pub message_key: String,
    /// Message translated for the locale the operation ran under.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CohortError {
    /// A referenced entity does not exist. This is a caller error, distinct
    /// from a policy violation.
    ReferenceNotFound { entity: &'static str, id: u64 },
    /// One or more policy rules rejected the operation. Every failed rule is
    /// reported, not just the first.
    PolicyViolation(Vec<RuleFailure>),
    /// A requested tenant is not among the user's reachable tenants. Never
    /// silently redirected elsewhere.
    UnknownTenant { tenant_id: u64 },
    /// No tenant was requested and the configured ambiguity policy could not
    /// pick one (zero reachable tenants, explicit selection required, or a
    /// stale preference).
    AmbiguousContext,
    /// A downstream lookup failed transiently. Propagated as-is; the caller
    /// owns retry policy.
    CollaboratorUnavailable(String),
    /// The operation input is missing an argument a rule needs, or the
    /// argument has the wrong type. A wiring error at the boundary, never a
    /// policy outcome.
    MalformedInput(String),
    /// Invariant breakage inside the library (e.g. a poisoned mock lock).
    Internal(String),
}

impl fmt::Display for CohortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CohortError::ReferenceNotFound { entity, id } => {
                write!(f, "{entity} {id} not found")
            }
            CohortError::PolicyViolation(failures) => {
                write!(f, "policy violation:")?;
                for failure in failures {
                    write!(f, " [{}] {}", failure.rule, failure.message)?;
                }
                Ok(())
            }
            CohortError::UnknownTenant { tenant_id } => {
                write!(f, "tenant {tenant_id} is not reachable for this user")
            }
            CohortError::AmbiguousContext => {
                write!(f, "active tenant is ambiguous and requires explicit selection")
            }
            CohortError::CollaboratorUnavailable(msg) => {
                write!(f, "collaborator unavailable: {msg}")
            }
            CohortError::MalformedInput(msg) => write!(f, "malformed operation input: {msg}"),
            CohortError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for CohortError {}
