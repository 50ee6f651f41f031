//! Session manager facade.
//!
//! Wires adapter → factory → store → reconciler → guard and exposes the
//! imperative surface the rest of the application uses: `login`, `logout`,
//! `refetch`, `verify_product`, plus read-only snapshots and subscription.

use std::sync::Arc;

use veritag_client::{ClientError, ClientFactory};
use veritag_core::{Role, VerificationStatus};
use veritag_identity::{CredentialProvider, IdentityHandle, LoginOutcome, ProviderAdapter};

use crate::error::SessionError;
use crate::guard::{ConsistencyGuard, GuardVerdict};
use crate::reconcile::SessionReconciler;
use crate::store::{SessionSnapshot, SessionStore};

pub struct SessionManager {
    adapter: ProviderAdapter,
    factory: Arc<dyn ClientFactory>,
    store: Arc<SessionStore>,
    reconciler: SessionReconciler,
    guard: Arc<ConsistencyGuard>,
}

impl SessionManager {
    /// Create the manager and run the bootstrap cycle: restore an existing
    /// delegation if the provider has one, otherwise settle on anonymous.
    pub async fn start(
        provider: Arc<dyn CredentialProvider>,
        factory: Arc<dyn ClientFactory>,
    ) -> Arc<Self> {
        let store = Arc::new(SessionStore::new(factory.bind(None)));
        let guard = Arc::new(ConsistencyGuard::new());
        let manager = Arc::new(Self {
            adapter: ProviderAdapter::new(provider),
            reconciler: SessionReconciler::new(Arc::clone(&store), Arc::clone(&guard)),
            guard,
            factory,
            store,
        });
        manager.bootstrap().await;
        manager
    }

    async fn bootstrap(&self) {
        match self.adapter.initialize().await {
            Some(handle) => {
                self.adopt_identity(&handle);
                self.reconcile_and_guard().await;
            }
            None => self.store.set_anonymous(self.factory.bind(None)),
        }
    }

    /// Bind a client to the handle and swap the (principal, client) pair.
    fn adopt_identity(&self, handle: &IdentityHandle) {
        let client = self.factory.bind(Some(handle));
        self.store.set_identity(handle.principal().clone(), client);
    }

    /// Run the interactive login ceremony.
    ///
    /// `role_hint` is the user's pre-auth role selection; it rides in the
    /// store until the post-login session initialization consumes it.
    /// Cancellation settles back on anonymous without error; provider
    /// failure settles on anonymous and reports `ProviderUnavailable` so the
    /// caller can offer a retry.
    pub async fn login(&self, role_hint: Option<Role>) -> Result<(), SessionError> {
        self.store.begin_authenticating(role_hint);
        match self.adapter.begin_login().await {
            LoginOutcome::Authenticated(handle) => {
                self.adopt_identity(&handle);
                self.reconcile_and_guard().await;
                Ok(())
            }
            LoginOutcome::Cancelled => {
                self.store.set_anonymous(self.factory.bind(None));
                Ok(())
            }
            LoginOutcome::Failed(err) => {
                let error = SessionError::ProviderUnavailable(err.to_string());
                self.store.set_anonymous(self.factory.bind(None));
                self.store.set_error(error.clone());
                Err(error)
            }
        }
    }

    /// End the session. Idempotent: logging out while anonymous is a no-op
    /// with the same terminal state.
    pub async fn logout(&self) {
        self.perform_logout().await;
    }

    /// Fetch fresh server truth for the current identity.
    pub async fn refetch(&self) {
        self.reconcile_and_guard().await;
    }

    /// Verify a scanned product code with whatever identity is current;
    /// anonymous verification is first-class.
    pub async fn verify_product(&self, code: &str) -> Result<VerificationStatus, ClientError> {
        let (_, client) = self.store.identity_pair();
        client.verify_product(code).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<SessionSnapshot> {
        self.store.subscribe()
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    async fn reconcile_and_guard(&self) {
        let report = self.reconciler.reconcile().await;
        if self.guard.observe(&report) == GuardVerdict::ForceLogout {
            tracing::warn!("forcing logout: local and server session state diverged");
            self.perform_logout().await;
        }
    }

    /// Local state reset is unconditional; remote logout and provider revoke
    /// failures are logged, never surfaced, so the UI cannot get stuck in
    /// `LoggingOut`.
    async fn perform_logout(&self) {
        self.store.begin_logout();
        let (principal, client) = self.store.identity_pair();
        if principal.is_some() {
            if let Err(err) = client.logout().await {
                tracing::warn!("remote logout failed (ignored): {err}");
            }
        }
        self.adapter.logout().await;
        self.guard.reset();
        self.store.set_anonymous(self.factory.bind(None));
    }
}
