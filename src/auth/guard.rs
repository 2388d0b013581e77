//! Authorization Guard
//! Mission: Decide whether an authenticated identity may mutate a recipe

use crate::auth::{error::AuthError, models::Identity};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Mutating operations gated by the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pluggable allow/deny rule.
///
/// `resource_owner` is the owning identity of the target resource when the
/// resource records one. Recipes currently carry no owner, so callers pass
/// `None`.
pub trait AuthorizationPolicy: Send + Sync {
    fn permits(&self, identity: &Identity, action: Action, resource_owner: Option<&str>) -> bool;
}

/// Any authenticated identity may act on any resource
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAuthenticated;

impl AuthorizationPolicy for AllowAuthenticated {
    fn permits(&self, _identity: &Identity, _action: Action, _owner: Option<&str>) -> bool {
        true
    }
}

/// Adapts a closure into a policy
pub struct FnPolicy<F>(pub F);

impl<F> AuthorizationPolicy for FnPolicy<F>
where
    F: Fn(&Identity, Action, Option<&str>) -> bool + Send + Sync,
{
    fn permits(&self, identity: &Identity, action: Action, resource_owner: Option<&str>) -> bool {
        (self.0)(identity, action, resource_owner)
    }
}

/// Guard invoked before every mutating recipe operation
#[derive(Clone)]
pub struct AuthorizationGuard {
    policy: Arc<dyn AuthorizationPolicy>,
}

impl AuthorizationGuard {
    pub fn new(policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self { policy }
    }

    /// Guard with the default permissive policy
    pub fn permissive() -> Self {
        Self::new(Arc::new(AllowAuthenticated))
    }

    pub fn authorize(
        &self,
        identity: &Identity,
        action: Action,
        resource_owner: Option<&str>,
    ) -> Result<(), AuthError> {
        if self.policy.permits(identity, action, resource_owner) {
            debug!(user = %identity, action = %action, "Authorized");
            return Ok(());
        }

        warn!(
            user = %identity,
            action = %action,
            owner = resource_owner.unwrap_or("-"),
            "⛔ Authorization denied"
        );

        Err(AuthError::Forbidden {
            identity: identity.username().to_string(),
            action,
        })
    }
}

impl Default for AuthorizationGuard {
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_guard_allows_every_action() {
        let guard = AuthorizationGuard::permissive();
        let alice = Identity::new("alice");

        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(guard.authorize(&alice, action, None).is_ok());
            assert!(guard.authorize(&alice, action, Some("bob")).is_ok());
        }
    }

    #[test]
    fn test_custom_policy_denies_with_identity_and_action() {
        let no_deletes = FnPolicy(|_: &Identity, action: Action, _: Option<&str>| {
            action != Action::Delete
        });
        let guard = AuthorizationGuard::new(Arc::new(no_deletes));
        let alice = Identity::new("alice");

        assert!(guard.authorize(&alice, Action::Update, None).is_ok());

        match guard.authorize(&alice, Action::Delete, None) {
            Err(AuthError::Forbidden { identity, action }) => {
                assert_eq!(identity, "alice");
                assert_eq!(action, Action::Delete);
            }
            other => panic!("Expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_owner_aware_policy_sees_owner() {
        let owner_only = FnPolicy(|identity: &Identity, _: Action, owner: Option<&str>| {
            owner.map_or(true, |o| o == identity.username())
        });
        let guard = AuthorizationGuard::new(Arc::new(owner_only));

        assert!(guard
            .authorize(&Identity::new("alice"), Action::Update, Some("alice"))
            .is_ok());
        assert!(guard
            .authorize(&Identity::new("bob"), Action::Update, Some("alice"))
            .is_err());
    }

    #[test]
    fn test_action_names() {
        assert_eq!(Action::Create.as_str(), "create");
        assert_eq!(Action::Update.to_string(), "update");
        assert_eq!(Action::Delete.to_string(), "delete");
    }
}
