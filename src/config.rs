//! Resolver configuration.

/// How [`resolve_active_context`](crate::ContextResolver::resolve_active_context)
/// picks a tenant when none was requested and the user can reach zero or
/// several tenants.
///
/// This is an explicit configuration point: the resolver never guesses a
/// tenant on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Refuse to pick; the caller must present a tenant selection to the
    /// user. This is the default.
    #[default]
    RequireExplicitSelection,
    /// Pick the first tenant in reachable (first-seen membership) order.
    FirstSeen,
    /// Pick the tenant stored as the user's last active context, if it is
    /// still reachable. A missing or stale preference refuses to pick rather
    /// than falling back to an arbitrary tenant.
    MostRecentlyUsed,
}

/// Configuration for [`ContextResolver`](crate::ContextResolver).
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// Tie-break policy for ambiguous resolution.
    pub ambiguity_policy: AmbiguityPolicy,
}

impl ResolverConfig {
    /// Creates a config with the given ambiguity policy.
    pub fn with_policy(ambiguity_policy: AmbiguityPolicy) -> Self {
        Self { ambiguity_policy }
    }
}
