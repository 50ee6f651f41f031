//! Authorization gate.
//!
//! A pure policy check consumed by page routing before a protected view
//! renders: no IO, no panics, no business logic.

use veritag_core::Role;

use crate::store::SessionSnapshot;

/// Routing decision for a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectLogin,
    RedirectUnauthorized,
}

/// Decide whether the current session may enter a view requiring
/// `required` roles.
///
/// Returns `None` while the store is in a transitional phase — the caller
/// shows a loading placeholder, not a redirect. An empty `required` slice
/// means authentication alone suffices. An authenticated user with no role
/// yet is mid-registration, not mid-authorization, so a role-gated view
/// redirects them to unauthorized rather than login.
pub fn decide(required: &[Role], snapshot: &SessionSnapshot) -> Option<AccessDecision> {
    if snapshot.is_loading() {
        return None;
    }
    if !snapshot.is_authenticated() {
        return Some(AccessDecision::RedirectLogin);
    }
    if required.is_empty() {
        return Some(AccessDecision::Allow);
    }
    match snapshot.role() {
        Some(role) if required.contains(&role) => Some(AccessDecision::Allow),
        _ => Some(AccessDecision::RedirectUnauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SessionPhase, SessionStore};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Arc;
    use veritag_client::{ClientError, ServiceClient};
    use veritag_core::{AuthContext, Principal, RoleProfile, VerificationStatus};

    struct StubClient {
        principal: Option<Principal>,
    }

    #[async_trait]
    impl ServiceClient for StubClient {
        fn bound_principal(&self) -> Option<&Principal> {
            self.principal.as_ref()
        }

        async fn get_auth_context(&self) -> Result<AuthContext, ClientError> {
            Ok(AuthContext::unregistered())
        }

        async fn initialize_session(
            &self,
            _role_hint: Option<Role>,
        ) -> Result<AuthContext, ClientError> {
            Ok(AuthContext::unregistered())
        }

        async fn logout(&self) -> Result<(), ClientError> {
            Ok(())
        }

        async fn verify_product(&self, _code: &str) -> Result<VerificationStatus, ClientError> {
            Ok(VerificationStatus::Invalid)
        }
    }

    fn snapshot_with(phase_setup: impl FnOnce(&SessionStore)) -> SessionSnapshot {
        let store = SessionStore::new(Arc::new(StubClient { principal: None }));
        phase_setup(&store);
        store.snapshot()
    }

    fn authenticated(profile: Option<RoleProfile>, registered: bool) -> SessionSnapshot {
        snapshot_with(|store| {
            let p = Principal::new("p-1");
            store.set_identity(
                p.clone(),
                Arc::new(StubClient {
                    principal: Some(p.clone()),
                }),
            );
            store.apply_context(
                &p,
                AuthContext {
                    registered,
                    profile,
                },
            );
        })
    }

    fn anonymous() -> SessionSnapshot {
        snapshot_with(|store| {
            store.set_anonymous(Arc::new(StubClient { principal: None }))
        })
    }

    #[test]
    fn loading_phases_yield_no_decision() {
        let bootstrapping = snapshot_with(|_| {});
        assert_eq!(bootstrapping.phase, SessionPhase::Bootstrapping);
        assert_eq!(decide(&[], &bootstrapping), None);

        let authenticating = snapshot_with(|store| store.begin_authenticating(None));
        assert_eq!(decide(&[Role::Admin], &authenticating), None);
    }

    #[test]
    fn anonymous_is_redirected_to_login() {
        assert_eq!(
            decide(&[Role::BrandOwner], &anonymous()),
            Some(AccessDecision::RedirectLogin)
        );
    }

    #[test]
    fn authenticated_without_role_passes_open_views() {
        let snap = authenticated(None, false);
        assert_eq!(decide(&[], &snap), Some(AccessDecision::Allow));
    }

    #[test]
    fn authenticated_without_role_is_unauthorized_for_gated_views() {
        let snap = authenticated(None, false);
        assert_eq!(
            decide(&[Role::BrandOwner], &snap),
            Some(AccessDecision::RedirectUnauthorized)
        );
    }

    #[test]
    fn wrong_role_is_unauthorized() {
        let snap = authenticated(Some(RoleProfile::Reseller(Default::default())), true);
        assert_eq!(
            decide(&[Role::BrandOwner], &snap),
            Some(AccessDecision::RedirectUnauthorized)
        );
    }

    #[test]
    fn matching_role_is_allowed() {
        let snap = authenticated(Some(RoleProfile::BrandOwner(Default::default())), true);
        assert_eq!(
            decide(&[Role::BrandOwner, Role::Admin], &snap),
            Some(AccessDecision::Allow)
        );
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Admin),
            Just(Role::BrandOwner),
            Just(Role::Reseller)
        ]
    }

    proptest! {
        // Anonymous users never see anything but a login redirect.
        #[test]
        fn anonymous_always_redirects_to_login(required in proptest::collection::vec(role_strategy(), 0..3)) {
            prop_assert_eq!(
                decide(&required, &anonymous()),
                Some(AccessDecision::RedirectLogin)
            );
        }

        // A registered user is allowed iff the view is open or lists their role.
        #[test]
        fn registered_allow_matches_membership(
            role in role_strategy(),
            required in proptest::collection::vec(role_strategy(), 0..3),
        ) {
            let profile = match role {
                Role::Admin => RoleProfile::Admin,
                Role::BrandOwner => RoleProfile::BrandOwner(Default::default()),
                Role::Reseller => RoleProfile::Reseller(Default::default()),
            };
            let snap = authenticated(Some(profile), true);
            let expected = if required.is_empty() || required.contains(&role) {
                AccessDecision::Allow
            } else {
                AccessDecision::RedirectUnauthorized
            };
            prop_assert_eq!(decide(&required, &snap), Some(expected));
        }
    }
}
