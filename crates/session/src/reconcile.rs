//! Session reconciler: the sole writer of server-confirmed session truth.
//!
//! A reconciliation fetches the auth context through the client bound to the
//! principal current *at fetch-initiation time*. Transient transport failures
//! get exactly one automatic retry. Results landing after the store's
//! principal has changed are discarded; the consistency guard never sees
//! them.

use std::sync::Arc;

use veritag_client::{ClientError, ServiceClient};
use veritag_core::{AuthContext, Principal};

use crate::error::SessionError;
use crate::guard::ConsistencyGuard;
use crate::store::SessionStore;

/// What a reconciliation cycle produced, for the consistency guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextReport {
    /// A context was fetched and applied to the store.
    Applied { registered: bool },
    /// The identity changed while the fetch was in flight; result dropped.
    Stale,
    /// There was no identity to reconcile.
    Skipped,
    /// The fetch failed even after the automatic retry.
    Failed { transient: bool },
}

pub struct SessionReconciler {
    store: Arc<SessionStore>,
    guard: Arc<ConsistencyGuard>,
}

impl SessionReconciler {
    pub fn new(store: Arc<SessionStore>, guard: Arc<ConsistencyGuard>) -> Self {
        Self { store, guard }
    }

    /// Run one reconciliation cycle against the current identity.
    ///
    /// If the backend reports the identity unregistered and this session was
    /// never confirmed registered, this is the one place that issues the
    /// first-time session initialization, forwarding the pre-auth role
    /// selection. A session the backend *used to* recognize must not be
    /// silently re-registered: its unregistered report flows through to the
    /// consistency guard untouched.
    pub async fn reconcile(&self) -> ContextReport {
        let (principal, client) = self.store.identity_pair();
        let Some(principal) = principal else {
            tracing::debug!("no identity to reconcile");
            return ContextReport::Skipped;
        };
        // Captured with the principal: by the time the fetch resolves, the
        // store's copy may belong to a different login.
        let role_hint = self.store.pre_auth_role();

        let mut context = match self.fetch_with_retry(client.as_ref()).await {
            Ok(context) => context,
            Err(err) => return self.report_failure(&principal, err),
        };

        if !context.registered && !self.guard.was_ever_registered() {
            // initialize_session registers the identity at the backend; a
            // fetch that outlived its login must not do that on behalf of a
            // superseded identity.
            if self.store.current_principal().as_ref() != Some(&principal) {
                tracing::debug!(
                    stale = %principal,
                    "skipping initialization for a superseded identity"
                );
                return ContextReport::Stale;
            }
            tracing::info!(%principal, role = ?role_hint, "identity unregistered, initializing session");
            context = match client.initialize_session(role_hint).await {
                Ok(context) => context,
                Err(err) => return self.report_failure(&principal, err),
            };
        }

        let registered = context.registered;
        if self.store.apply_context(&principal, context) {
            ContextReport::Applied { registered }
        } else {
            ContextReport::Stale
        }
    }

    async fn fetch_with_retry(
        &self,
        client: &dyn ServiceClient,
    ) -> Result<AuthContext, ClientError> {
        match client.get_auth_context().await {
            Err(err) if err.is_transient() => {
                tracing::warn!("context fetch failed ({err}), retrying once");
                client.get_auth_context().await
            }
            result => result,
        }
    }

    fn report_failure(&self, fetched_for: &Principal, err: ClientError) -> ContextReport {
        // An error that arrives for a superseded identity is as stale as a
        // success would be.
        if self.store.current_principal().as_ref() == Some(fetched_for) {
            let transient = err.is_transient();
            // Inconsistency implicates a session the backend once confirmed;
            // a rejection before any registration is a dismissible fetch
            // failure, not a divergence.
            let session_err = if transient || !self.guard.was_ever_registered() {
                SessionError::TransientFetch(err.to_string())
            } else {
                SessionError::Inconsistent
            };
            tracing::warn!(%fetched_for, transient, "context fetch failed: {err}");
            self.store.set_error(session_err);
            ContextReport::Failed { transient }
        } else {
            ContextReport::Stale
        }
    }
}
