//! `veritag-client` — identity-bound remote-service client.
//!
//! A [`ServiceClient`] carries either an anonymous identity or a specific
//! delegation's signing capability; exactly one is current at any time, held
//! by the session store. The [`ClientFactory`] is pure with respect to its
//! inputs: binding the same identity always yields a client with identical
//! signing behavior, and binding `None` yields a first-class anonymous
//! client (the verification flow works logged out).

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use veritag_core::{AuthContext, Principal, Role, VerificationStatus};
use veritag_identity::IdentityHandle;

pub use http::{HttpClientFactory, HttpServiceClient};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, 5xx). Worth one
    /// automatic retry.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered and said no (4xx, application error envelope).
    #[error("backend rejected call ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with something this client cannot decode.
    #[error("invalid response payload: {0}")]
    Payload(String),
}

impl ClientError {
    /// Whether the failure may be a blip rather than a verdict.
    pub fn is_transient(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// Remote backend seam, bound to at most one identity.
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Principal whose delegation signs this client's calls, if any.
    fn bound_principal(&self) -> Option<&Principal>;

    /// Fetch the server-side session context for the bound identity.
    /// Anonymous callers get `registered == false`.
    async fn get_auth_context(&self) -> Result<AuthContext, ClientError>;

    /// First-time session initialization: registers the bound identity,
    /// applying the pre-auth role hint, and returns the resulting context.
    async fn initialize_session(
        &self,
        role_hint: Option<Role>,
    ) -> Result<AuthContext, ClientError>;

    /// Tell the backend the session is over. No meaningful payload.
    async fn logout(&self) -> Result<(), ClientError>;

    /// Verify a scanned product code. Works anonymously.
    async fn verify_product(&self, code: &str) -> Result<VerificationStatus, ClientError>;
}

/// Produces a bound [`ServiceClient`] for an identity (or none).
pub trait ClientFactory: Send + Sync {
    fn bind(&self, identity: Option<&IdentityHandle>) -> Arc<dyn ServiceClient>;
}
