//! Single process-wide session state store.
//!
//! The store is an explicit, injectable container created at application
//! start; nothing in this workspace reaches for it as a global. All state
//! transitions go through the methods below, and the `(principal, client)`
//! pair is only ever replaced as a unit, so no observer can see a principal
//! paired with a client bound to a different identity.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use veritag_client::ServiceClient;
use veritag_core::{AuthContext, Principal, Role};

use crate::error::SessionError;

/// Where the session state machine currently is.
///
/// These are states of the machine, not UI pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Initial: probing the provider for an existing delegation.
    Bootstrapping,
    /// No identity; the client is bound anonymously.
    Anonymous,
    /// An interactive login ceremony is in flight.
    Authenticating,
    /// Identity present, server registration not yet confirmed.
    Unregistered,
    /// Server confirmed registration; role and profile populated.
    Registered,
    /// Transient; always resolves to `Anonymous`.
    LoggingOut,
}

impl SessionPhase {
    /// Phases during which dependents should render a placeholder rather
    /// than make a routing decision.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            SessionPhase::Bootstrapping | SessionPhase::Authenticating | SessionPhase::LoggingOut
        )
    }
}

/// Read-only view of the session, published on every mutation.
#[derive(Clone)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub principal: Option<Principal>,
    pub client: Arc<dyn ServiceClient>,
    pub context: Option<AuthContext>,
    pub pre_auth_role: Option<Role>,
    pub error: Option<SessionError>,
}

impl SessionSnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase.is_transitional()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Unregistered | SessionPhase::Registered
        )
    }

    pub fn role(&self) -> Option<Role> {
        self.context.as_ref().and_then(AuthContext::role)
    }
}

struct Inner {
    phase: SessionPhase,
    principal: Option<Principal>,
    client: Arc<dyn ServiceClient>,
    context: Option<AuthContext>,
    pre_auth_role: Option<Role>,
    error: Option<SessionError>,
}

impl Inner {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            principal: self.principal.clone(),
            client: Arc::clone(&self.client),
            context: self.context.clone(),
            pre_auth_role: self.pre_auth_role,
            error: self.error.clone(),
        }
    }
}

/// The only mutable shared resource of the session subsystem.
pub struct SessionStore {
    inner: Mutex<Inner>,
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionStore {
    /// Create the store in `Bootstrapping` with an anonymous client.
    pub fn new(anonymous_client: Arc<dyn ServiceClient>) -> Self {
        let inner = Inner {
            phase: SessionPhase::Bootstrapping,
            principal: None,
            client: anonymous_client,
            context: None,
            pre_auth_role: None,
            error: None,
        };
        let (tx, _rx) = watch::channel(inner.snapshot());
        Self {
            inner: Mutex::new(inner),
            tx,
        }
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.inner.lock().expect("session store poisoned");
        let result = f(&mut inner);
        let _ = self.tx.send(inner.snapshot());
        result
    }

    /// Enter `Authenticating`, recording the user's pre-auth role selection.
    pub fn begin_authenticating(&self, role_hint: Option<Role>) {
        self.mutate(|inner| {
            inner.phase = SessionPhase::Authenticating;
            inner.pre_auth_role = role_hint;
            inner.error = None;
        });
    }

    /// Adopt a new identity: principal and bound client swap together.
    ///
    /// Enters `Unregistered`; server truth for the new identity is unknown
    /// until the reconciler confirms it.
    pub fn set_identity(&self, principal: Principal, client: Arc<dyn ServiceClient>) {
        debug_assert_eq!(
            client.bound_principal(),
            Some(&principal),
            "client must be bound to the principal it is stored with"
        );
        self.mutate(|inner| {
            tracing::info!(%principal, "session identity adopted");
            inner.principal = Some(principal);
            inner.client = client;
            inner.phase = SessionPhase::Unregistered;
            inner.context = None;
            inner.error = None;
        });
    }

    /// Drop any identity: principal cleared and client rebound anonymously,
    /// again as a unit. Terminal state of every logout path.
    pub fn set_anonymous(&self, anonymous_client: Arc<dyn ServiceClient>) {
        debug_assert!(anonymous_client.bound_principal().is_none());
        self.mutate(|inner| {
            inner.principal = None;
            inner.client = anonymous_client;
            inner.phase = SessionPhase::Anonymous;
            inner.context = None;
            inner.pre_auth_role = None;
            inner.error = None;
        });
    }

    /// Enter the transient `LoggingOut` phase.
    pub fn begin_logout(&self) {
        self.mutate(|inner| inner.phase = SessionPhase::LoggingOut);
    }

    /// Apply a context fetched for `fetched_for`.
    ///
    /// Returns `false` (and changes nothing) when the store's principal has
    /// moved on since the fetch started; a stale result must never resurrect
    /// or overwrite a session it does not belong to.
    pub fn apply_context(&self, fetched_for: &Principal, context: AuthContext) -> bool {
        self.mutate(|inner| {
            if inner.principal.as_ref() != Some(fetched_for) {
                tracing::debug!(
                    stale = %fetched_for,
                    "discarding context fetched for a superseded identity"
                );
                return false;
            }
            inner.phase = if context.registered {
                SessionPhase::Registered
            } else {
                SessionPhase::Unregistered
            };
            if context.registered {
                // The role selection must not persist across a completed,
                // registered session.
                inner.pre_auth_role = None;
            }
            inner.context = Some(context);
            inner.error = None;
            true
        })
    }

    /// Record a session-level error without changing phase.
    pub fn set_error(&self, error: SessionError) {
        self.mutate(|inner| inner.error = Some(error));
    }

    /// The pre-auth role selection, if a login ceremony recorded one. The
    /// store clears it on registration and on every return to anonymous.
    pub fn pre_auth_role(&self) -> Option<Role> {
        self.inner.lock().expect("session store poisoned").pre_auth_role
    }

    /// The current `(principal, client)` pair, read atomically.
    pub fn identity_pair(&self) -> (Option<Principal>, Arc<dyn ServiceClient>) {
        let inner = self.inner.lock().expect("session store poisoned");
        (inner.principal.clone(), Arc::clone(&inner.client))
    }

    pub fn current_principal(&self) -> Option<Principal> {
        self.inner.lock().expect("session store poisoned").principal.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().expect("session store poisoned").snapshot()
    }

    /// Subscribe to snapshot updates. Every mutation publishes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }
}
