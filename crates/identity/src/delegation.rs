//! Delegated credential model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use veritag_core::Principal;

/// A time-bounded credential issued by the identity provider.
///
/// The token material is opaque: this client never inspects it, it only
/// forwards it so outgoing calls can be attributed to the principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// Principal the provider derived for this delegation.
    pub principal: Principal,

    /// Opaque signing material for the delegation.
    pub token: String,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelegationError {
    #[error("delegation has expired")]
    Expired,

    #[error("delegation not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid delegation time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate a delegation's time window.
///
/// Note: this validates the window only. Whether the provider's signature
/// actually verifies is the provider's concern, not this client's.
pub fn validate_delegation(
    delegation: &Delegation,
    now: DateTime<Utc>,
) -> Result<(), DelegationError> {
    if delegation.expires_at <= delegation.issued_at {
        return Err(DelegationError::InvalidTimeWindow);
    }
    if now < delegation.issued_at {
        return Err(DelegationError::NotYetValid);
    }
    if now >= delegation.expires_at {
        return Err(DelegationError::Expired);
    }
    Ok(())
}

/// Handle to a live delegated identity.
///
/// Owned by the provider adapter for its lifetime; the rest of the system
/// holds only the derived [`Principal`]. The signing token is exposed once,
/// to the client factory, which consumes it to bind a service client.
#[derive(Debug, Clone)]
pub struct IdentityHandle {
    delegation: Delegation,
}

impl IdentityHandle {
    pub fn new(delegation: Delegation) -> Self {
        Self { delegation }
    }

    pub fn principal(&self) -> &Principal {
        &self.delegation.principal
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.delegation.expires_at
    }

    /// Signing material for binding a service client.
    ///
    /// Only the client factory should call this; everything else works with
    /// `principal()`.
    pub fn bearer_token(&self) -> &str {
        &self.delegation.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn delegation(issued: DateTime<Utc>, expires: DateTime<Utc>) -> Delegation {
        Delegation {
            principal: Principal::new("p-1"),
            token: "tok".to_string(),
            issued_at: issued,
            expires_at: expires,
        }
    }

    #[test]
    fn valid_window_passes() {
        let now = Utc::now();
        let d = delegation(now - Duration::minutes(5), now + Duration::minutes(5));
        assert!(validate_delegation(&d, now).is_ok());
    }

    #[test]
    fn expired_delegation_rejected() {
        let now = Utc::now();
        let d = delegation(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(validate_delegation(&d, now), Err(DelegationError::Expired));
    }

    #[test]
    fn future_delegation_rejected() {
        let now = Utc::now();
        let d = delegation(now + Duration::minutes(1), now + Duration::hours(1));
        assert_eq!(
            validate_delegation(&d, now),
            Err(DelegationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_rejected() {
        let now = Utc::now();
        let d = delegation(now, now);
        assert_eq!(
            validate_delegation(&d, now),
            Err(DelegationError::InvalidTimeWindow)
        );
    }
}
