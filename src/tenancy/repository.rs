use async_trait::async_trait;

use super::types::{ActiveContextRecord, Membership, OrganizationalUnit, Tenant};
use crate::CohortError;

/// Read access to tenant records.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> Result<Option<Tenant>, CohortError>;
}

/// Read access to organizational unit records.
#[async_trait]
pub trait OrganizationalUnitRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> Result<Option<OrganizationalUnit>, CohortError>;
}

/// Read access to membership records.
///
/// Implementations must return memberships in creation order; the resolver's
/// first-seen tenant ordering depends on it.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find_by_user(&self, user_id: u64) -> Result<Vec<Membership>, CohortError>;
    async fn find_by_unit(
        &self,
        organizational_unit_id: u64,
    ) -> Result<Vec<Membership>, CohortError>;
}

/// Read access to a user's persisted "last active tenant" preference.
///
/// Writing the preference (on an explicit switch) belongs to the host
/// application; the resolver never persists anything.
#[async_trait]
pub trait ActiveContextRepository: Send + Sync {
    async fn get(&self, user_id: u64) -> Result<Option<ActiveContextRecord>, CohortError>;
}

// Shared handles satisfy the seams too, so a test can keep a clone of a mock
// while the resolver owns the other.

#[async_trait]
impl<T: TenantRepository + ?Sized> TenantRepository for std::sync::Arc<T> {
    async fn find_by_id(&self, id: u64) -> Result<Option<Tenant>, CohortError> {
        (**self).find_by_id(id).await
    }
}

#[async_trait]
impl<T: OrganizationalUnitRepository + ?Sized> OrganizationalUnitRepository for std::sync::Arc<T> {
    async fn find_by_id(&self, id: u64) -> Result<Option<OrganizationalUnit>, CohortError> {
        (**self).find_by_id(id).await
    }
}

#[async_trait]
impl<T: MembershipRepository + ?Sized> MembershipRepository for std::sync::Arc<T> {
    async fn find_by_user(&self, user_id: u64) -> Result<Vec<Membership>, CohortError> {
        (**self).find_by_user(user_id).await
    }

    async fn find_by_unit(
        &self,
        organizational_unit_id: u64,
    ) -> Result<Vec<Membership>, CohortError> {
        (**self).find_by_unit(organizational_unit_id).await
    }
}

#[async_trait]
impl<T: ActiveContextRepository + ?Sized> ActiveContextRepository for std::sync::Arc<T> {
    async fn get(&self, user_id: u64) -> Result<Option<ActiveContextRecord>, CohortError> {
        (**self).get(user_id).await
    }
}
