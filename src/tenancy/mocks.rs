use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::repository::{
    ActiveContextRepository, MembershipRepository, OrganizationalUnitRepository, TenantRepository,
};
use super::types::{ActiveContextRecord, Membership, OrganizationalUnit, Tenant};
use crate::CohortError;

pub struct MockTenantRepository {
    tenants: RwLock<HashMap<u64, Tenant>>,
    next_id: AtomicU64,
}

impl MockTenantRepository {
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Test helper: insert a tenant and return it.
    pub fn add_tenant(&self, name: &str) -> Result<Tenant, CohortError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let tenant = Tenant {
            id,
            name: name.to_owned(),
            created_at: Utc::now(),
        };

        let mut tenants = self
            .tenants
            .write()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        tenants.insert(id, tenant.clone());

        Ok(tenant)
    }
}

impl Default for MockTenantRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantRepository for MockTenantRepository {
    async fn find_by_id(&self, id: u64) -> Result<Option<Tenant>, CohortError> {
        let tenants = self
            .tenants
            .read()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        Ok(tenants.get(&id).cloned())
    }
}

pub struct MockOrganizationalUnitRepository {
    units: RwLock<HashMap<u64, OrganizationalUnit>>,
    next_id: AtomicU64,
}

impl MockOrganizationalUnitRepository {
    pub fn new() -> Self {
        Self {
            units: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Test helper: insert a unit under the given tenant and return it.
    pub fn add_unit(&self, tenant_id: u64, name: &str) -> Result<OrganizationalUnit, CohortError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let unit = OrganizationalUnit {
            id,
            tenant_id,
            name: name.to_owned(),
            created_at: Utc::now(),
        };

        let mut units = self
            .units
            .write()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        units.insert(id, unit.clone());

        Ok(unit)
    }
}

impl Default for MockOrganizationalUnitRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganizationalUnitRepository for MockOrganizationalUnitRepository {
    async fn find_by_id(&self, id: u64) -> Result<Option<OrganizationalUnit>, CohortError> {
        let units = self
            .units
            .read()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        Ok(units.get(&id).cloned())
    }
}

pub struct MockMembershipRepository {
    memberships: RwLock<HashMap<u64, Membership>>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
}

impl MockMembershipRepository {
    pub fn new() -> Self {
        Self {
            memberships: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Test helper: make every lookup fail with `CollaboratorUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Test helper: insert a membership, enforcing the one-per-(user, unit)
    /// invariant.
    pub fn add_membership(
        &self,
        user_id: u64,
        organizational_unit_id: u64,
        active: bool,
    ) -> Result<Membership, CohortError> {
        let mut memberships = self
            .memberships
            .write()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;

        let duplicate = memberships
            .values()
            .any(|m| m.user_id == user_id && m.organizational_unit_id == organizational_unit_id);
        if duplicate {
            return Err(CohortError::Internal(format!(
                "user {user_id} already has a membership in unit {organizational_unit_id}"
            )));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let membership = Membership {
            id,
            user_id,
            organizational_unit_id,
            active,
            created_at: now,
            updated_at: now,
        };
        memberships.insert(id, membership.clone());

        Ok(membership)
    }

    /// Test helper: flip a membership's active flag (e.g. a dropout).
    pub fn set_active(&self, membership_id: u64, active: bool) -> Result<(), CohortError> {
        let mut memberships = self
            .memberships
            .write()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;

        let membership = memberships
            .get_mut(&membership_id)
            .ok_or(CohortError::ReferenceNotFound {
                entity: "membership",
                id: membership_id,
            })?;
        membership.active = active;
        membership.updated_at = Utc::now();

        Ok(())
    }

    fn check_available(&self) -> Result<(), CohortError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CohortError::CollaboratorUnavailable(
                "membership store unreachable".into(),
            ));
        }
        Ok(())
    }

    fn sorted_matches<F>(&self, predicate: F) -> Result<Vec<Membership>, CohortError>
    where
        F: Fn(&Membership) -> bool,
    {
        let memberships = self
            .memberships
            .read()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;

        let mut matches: Vec<Membership> =
            memberships.values().filter(|m| predicate(m)).cloned().collect();
        // ids are allocated in creation order
        matches.sort_by_key(|m| m.id);

        Ok(matches)
    }
}

impl Default for MockMembershipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipRepository for MockMembershipRepository {
    async fn find_by_user(&self, user_id: u64) -> Result<Vec<Membership>, CohortError> {
        self.check_available()?;
        self.sorted_matches(|m| m.user_id == user_id)
    }

    async fn find_by_unit(
        &self,
        organizational_unit_id: u64,
    ) -> Result<Vec<Membership>, CohortError> {
        self.check_available()?;
        self.sorted_matches(|m| m.organizational_unit_id == organizational_unit_id)
    }
}

pub struct MockActiveContextRepository {
    contexts: RwLock<HashMap<u64, ActiveContextRecord>>,
}

impl MockActiveContextRepository {
    pub fn new() -> Self {
        Self {
            contexts: RwLock::new(HashMap::new()),
        }
    }

    /// Test helper: store a "last active tenant" preference.
    pub fn set_preference(&self, user_id: u64, tenant_id: u64) -> Result<(), CohortError> {
        let mut contexts = self
            .contexts
            .write()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        contexts.insert(
            user_id,
            ActiveContextRecord {
                user_id,
                tenant_id,
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}

impl Default for MockActiveContextRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActiveContextRepository for MockActiveContextRepository {
    async fn get(&self, user_id: u64) -> Result<Option<ActiveContextRecord>, CohortError> {
        let contexts = self
            .contexts
            .read()
            .map_err(|_| CohortError::Internal("lock poisoned".into()))?;
        Ok(contexts.get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn membership_uniqueness_is_enforced() {
        let repo = MockMembershipRepository::new();
        repo.add_membership(1, 10, true).unwrap();

        let duplicate = repo.add_membership(1, 10, false);
        assert!(duplicate.is_err());

        // same user in a different unit is fine
        repo.add_membership(1, 11, true).unwrap();
        let memberships = repo.find_by_user(1).await.unwrap();
        assert_eq!(memberships.len(), 2);
    }

    #[tokio::test]
    async fn memberships_come_back_in_creation_order() {
        let repo = MockMembershipRepository::new();
        let first = repo.add_membership(5, 20, true).unwrap();
        let second = repo.add_membership(5, 21, true).unwrap();
        let third = repo.add_membership(5, 22, false).unwrap();

        let memberships = repo.find_by_user(5).await.unwrap();
        let ids: Vec<u64> = memberships.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test]
    async fn unavailable_store_surfaces_collaborator_error() {
        let repo = MockMembershipRepository::new();
        repo.add_membership(2, 30, true).unwrap();
        repo.set_unavailable(true);

        let err = repo.find_by_user(2).await.unwrap_err();
        assert!(matches!(err, CohortError::CollaboratorUnavailable(_)));

        repo.set_unavailable(false);
        assert_eq!(repo.find_by_user(2).await.unwrap().len(), 1);
    }
}
