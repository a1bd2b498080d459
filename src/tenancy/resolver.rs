use super::repository::{
    ActiveContextRepository, MembershipRepository, OrganizationalUnitRepository, TenantRepository,
};
use super::types::Tenant;
use crate::config::{AmbiguityPolicy, ResolverConfig};
use crate::CohortError;

/// Resolves which tenants a user can reach through their memberships and
/// which one is the active context for the current request.
///
/// The resolver holds no state of its own: every answer is computed fresh
/// from the repositories, so concurrent calls for different users need no
/// coordination. The active context is never persisted here; storing a
/// "last active tenant" preference is the host application's job.
pub struct ContextResolver<M, U, T, C>
where
    M: MembershipRepository,
    U: OrganizationalUnitRepository,
    T: TenantRepository,
    C: ActiveContextRepository,
{
    membership_repo: M,
    unit_repo: U,
    tenant_repo: T,
    context_repo: C,
    config: ResolverConfig,
}

impl<M, U, T, C> ContextResolver<M, U, T, C>
where
    M: MembershipRepository,
    U: OrganizationalUnitRepository,
    T: TenantRepository,
    C: ActiveContextRepository,
{
    /// Creates a resolver with the default configuration (ambiguous
    /// resolution requires explicit selection).
    pub fn new(membership_repo: M, unit_repo: U, tenant_repo: T, context_repo: C) -> Self {
        Self::with_config(
            membership_repo,
            unit_repo,
            tenant_repo,
            context_repo,
            ResolverConfig::default(),
        )
    }

    /// Creates a resolver with a custom configuration.
    pub fn with_config(
        membership_repo: M,
        unit_repo: U,
        tenant_repo: T,
        context_repo: C,
        config: ResolverConfig,
    ) -> Self {
        Self {
            membership_repo,
            unit_repo,
            tenant_repo,
            context_repo,
            config,
        }
    }

    /// Returns the tenants reachable through the user's memberships, in
    /// first-seen membership order, deduplicated by tenant.
    ///
    /// A user with no memberships gets an empty vec, not an error. A
    /// membership pointing at a missing unit or tenant is a data-integrity
    /// fault and fails with `ReferenceNotFound` rather than being skipped.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_reachable_tenants", skip(self), err)
    )]
    pub async fn list_reachable_tenants(&self, user_id: u64) -> Result<Vec<Tenant>, CohortError> {
        let memberships = self.membership_repo.find_by_user(user_id).await?;

        let mut seen: Vec<u64> = Vec::new();
        let mut tenants: Vec<Tenant> = Vec::new();

        for membership in memberships {
            let unit_id = membership.organizational_unit_id;
            let unit = self.unit_repo.find_by_id(unit_id).await?.ok_or(
                CohortError::ReferenceNotFound {
                    entity: "organizational unit",
                    id: unit_id,
                },
            )?;

            if seen.contains(&unit.tenant_id) {
                continue;
            }
            seen.push(unit.tenant_id);

            let tenant = self.tenant_repo.find_by_id(unit.tenant_id).await?.ok_or(
                CohortError::ReferenceNotFound {
                    entity: "tenant",
                    id: unit.tenant_id,
                },
            )?;
            tenants.push(tenant);
        }

        Ok(tenants)
    }

    /// Whether the user should be offered a tenant-switch affordance at all.
    ///
    /// True only when more than one tenant is reachable; a single-tenant
    /// user never sees switching.
    pub async fn offers_tenant_switching(&self, user_id: u64) -> Result<bool, CohortError> {
        let tenants = self.list_reachable_tenants(user_id).await?;
        Ok(tenants.len() > 1)
    }

    /// Determines the user's active tenant for this request.
    ///
    /// A requested tenant (the "switch" path) wins if reachable and fails
    /// with `UnknownTenant` otherwise; falling back silently would grant
    /// access to a tenant the user cannot reach. With no request, a single
    /// reachable tenant is returned directly; zero or several reachable
    /// tenants resolve according to the configured [`AmbiguityPolicy`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "resolve_active_context", skip(self), err)
    )]
    pub async fn resolve_active_context(
        &self,
        user_id: u64,
        requested_tenant_id: Option<u64>,
    ) -> Result<Tenant, CohortError> {
        let reachable = self.list_reachable_tenants(user_id).await?;

        if let Some(tenant_id) = requested_tenant_id {
            let Some(tenant) = reachable.iter().find(|t| t.id == tenant_id) else {
                log::warn!(
                    target: "cohort",
                    "msg=\"requested tenant not reachable\", user_id={user_id}, tenant_id={tenant_id}"
                );
                return Err(CohortError::UnknownTenant { tenant_id });
            };

            log::info!(
                target: "cohort",
                "msg=\"active context switched\", user_id={user_id}, tenant_id={tenant_id}"
            );
            return Ok(tenant.clone());
        }

        // zero or one reachable tenant needs no policy: the sole tenant wins,
        // and nothing can resolve an empty reachable set
        if reachable.len() <= 1 {
            return reachable
                .into_iter()
                .next()
                .ok_or(CohortError::AmbiguousContext);
        }

        match self.config.ambiguity_policy {
            AmbiguityPolicy::RequireExplicitSelection => Err(CohortError::AmbiguousContext),
            AmbiguityPolicy::FirstSeen => reachable
                .into_iter()
                .next()
                .ok_or(CohortError::AmbiguousContext),
            AmbiguityPolicy::MostRecentlyUsed => {
                let preference = self.context_repo.get(user_id).await?;
                let preferred = preference.and_then(|record| {
                    reachable.into_iter().find(|t| t.id == record.tenant_id)
                });
                preferred.ok_or(CohortError::AmbiguousContext)
            }
        }
    }
}
