//! Adapter enforcing the credential-provider contract.
//!
//! The session layer treats "no identity" as a safe default, so everything
//! here degrades towards anonymous: restore failures are logged and mapped
//! to `None`, revoke failures are logged and swallowed, and login reports a
//! discriminated [`LoginOutcome`] instead of raising.

use std::sync::Arc;

use chrono::Utc;

use crate::delegation::{IdentityHandle, validate_delegation};
use crate::provider::{CredentialProvider, LoginOutcome, ProviderError};

/// Wraps an external [`CredentialProvider`] behind the adapter contract.
#[derive(Clone)]
pub struct ProviderAdapter {
    provider: Arc<dyn CredentialProvider>,
}

impl ProviderAdapter {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self { provider }
    }

    /// Look for an existing, non-expired delegation.
    ///
    /// Never fails: provider errors and expired delegations both come back
    /// as `None` (anonymous access).
    pub async fn initialize(&self) -> Option<IdentityHandle> {
        let delegation = match self.provider.restore().await {
            Ok(Some(delegation)) => delegation,
            Ok(None) => {
                tracing::debug!("no persisted delegation, starting anonymous");
                return None;
            }
            Err(err) => {
                tracing::warn!("provider restore failed, starting anonymous: {err}");
                return None;
            }
        };

        match validate_delegation(&delegation, Utc::now()) {
            Ok(()) => {
                tracing::info!(principal = %delegation.principal, "restored delegated identity");
                Some(IdentityHandle::new(delegation))
            }
            Err(err) => {
                tracing::info!("persisted delegation unusable ({err}), starting anonymous");
                None
            }
        }
    }

    /// Run the interactive login ceremony.
    pub async fn begin_login(&self) -> LoginOutcome {
        match self.provider.login().await {
            Ok(Some(delegation)) => match validate_delegation(&delegation, Utc::now()) {
                Ok(()) => {
                    tracing::info!(principal = %delegation.principal, "login ceremony succeeded");
                    LoginOutcome::Authenticated(IdentityHandle::new(delegation))
                }
                Err(err) => {
                    tracing::warn!("provider issued an unusable delegation: {err}");
                    LoginOutcome::Failed(ProviderError::Protocol(err.to_string()))
                }
            },
            Ok(None) => {
                tracing::info!("login ceremony cancelled by user");
                LoginOutcome::Cancelled
            }
            Err(err) => {
                tracing::warn!("login ceremony failed: {err}");
                LoginOutcome::Failed(err)
            }
        }
    }

    /// Revoke the local delegation. Idempotent; revoke failures are logged,
    /// never surfaced.
    pub async fn logout(&self) {
        if let Err(err) = self.provider.revoke().await {
            tracing::warn!("provider revoke failed (local logout proceeds): {err}");
        }
    }
}
