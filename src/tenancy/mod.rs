//! Tenants, organizational units, memberships, and active-context resolution.

mod repository;
mod resolver;
mod types;

pub use repository::{
    ActiveContextRepository, MembershipRepository, OrganizationalUnitRepository, TenantRepository,
};
pub use resolver::ContextResolver;
pub use types::{ActiveContextRecord, Membership, OrganizationalUnit, Tenant};

#[cfg(feature = "mocks")]
mod mocks;

#[cfg(feature = "mocks")]
pub use mocks::{
    MockActiveContextRepository, MockMembershipRepository, MockOrganizationalUnitRepository,
    MockTenantRepository,
};
