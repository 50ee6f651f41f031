//! Seam to the external delegated identity provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::delegation::{Delegation, IdentityHandle};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider itself could not be reached (network, outage).
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered, but the exchange made no sense.
    #[error("identity provider protocol error: {0}")]
    Protocol(String),
}

/// Outcome of an interactive login ceremony.
///
/// Cancellation and failure are ordinary values, not exceptions, so the
/// caller can fall back to anonymous state deterministically.
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(IdentityHandle),
    Cancelled,
    Failed(ProviderError),
}

/// The external delegated identity provider.
///
/// Implementations run the interactive ceremony and persist the delegation
/// however they like; this client only sees the resulting [`Delegation`].
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return a previously persisted delegation, if one exists.
    ///
    /// Expiry is *not* checked here; the adapter does that, so providers can
    /// stay dumb about time.
    async fn restore(&self) -> Result<Option<Delegation>, ProviderError>;

    /// Run the interactive login ceremony.
    ///
    /// `Ok(None)` means the user cancelled. There is no subsystem-imposed
    /// timeout: the ceremony is user-driven.
    async fn login(&self) -> Result<Option<Delegation>, ProviderError>;

    /// Revoke the locally persisted delegation.
    async fn revoke(&self) -> Result<(), ProviderError>;
}
