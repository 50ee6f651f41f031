//! `veritag-identity` — credential provider boundary.
//!
//! The delegated identity provider is an external collaborator: it runs the
//! interactive login ceremony and persists the resulting delegation. This
//! crate owns the seam to it (`CredentialProvider`), the credential types
//! (`Delegation`, `IdentityHandle`), and `ProviderAdapter`, which enforces
//! the contracts the session layer relies on (initialize never fails, login
//! yields an explicit outcome, logout is idempotent).

pub mod adapter;
pub mod delegation;
pub mod provider;

pub use adapter::ProviderAdapter;
pub use delegation::{Delegation, DelegationError, IdentityHandle, validate_delegation};
pub use provider::{CredentialProvider, LoginOutcome, ProviderError};
