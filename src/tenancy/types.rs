//! Core records for the tenancy hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant is the top-level organizational boundary isolating cohorts of
/// users (a "school" in the education domain this crate grew out of).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique identifier.
    pub id: u64,
    /// Human-readable tenant name.
    pub name: String,
    /// When the tenant was created.
    pub created_at: DateTime<Utc>,
}

/// An organizational unit is a team within a tenant (a "startup"). It owns
/// submissions and memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationalUnit {
    /// Unique identifier.
    pub id: u64,
    /// The tenant this unit belongs to. Exactly one, always.
    pub tenant_id: u64,
    /// Human-readable unit name.
    pub name: String,
    /// When the unit was created.
    pub created_at: DateTime<Utc>,
}

/// Links a user to an organizational unit (a "founder" record).
///
/// A user may hold memberships in several units, possibly across tenants,
/// but at most one per (user, unit) pair. The `active` flag is the
/// membership's lifecycle state; this crate only reads it, the transition
/// (e.g. marking a member as dropped out) belongs to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Unique identifier.
    pub id: u64,
    /// The user who holds the membership.
    pub user_id: u64,
    /// The organizational unit the user belongs to.
    pub organizational_unit_id: u64,
    /// Whether the membership is currently active.
    pub active: bool,
    /// When the user joined the unit.
    pub created_at: DateTime<Utc>,
    /// When the membership was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A persisted "last active tenant" preference for a user.
///
/// Owned by the host application; the resolver only reads it, and only under
/// the most-recently-used ambiguity policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveContextRecord {
    /// The user ID.
    pub user_id: u64,
    /// The tenant the user last had active.
    pub tenant_id: u64,
    /// When the preference was last updated.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_serializes_with_active_flag() {
        let membership = Membership {
            id: 7,
            user_id: 3,
            organizational_unit_id: 12,
            active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&membership).unwrap();
        assert_eq!(json["active"], serde_json::json!(false));
        assert_eq!(json["organizational_unit_id"], serde_json::json!(12));
    }
}
