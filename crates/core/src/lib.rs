//! `veritag-core` — domain foundation for the VeriTag client.
//!
//! This crate contains **pure domain** primitives shared by the identity,
//! client and session layers: the opaque principal, the closed role set,
//! and the server-reported authentication context. No IO, no async.

pub mod context;
pub mod error;
pub mod principal;
pub mod roles;

pub use context::{
    AuthContext, BrandOwnerProfile, OrganizationSummary, ResellerProfile, RoleProfile,
    VerificationStatus,
};
pub use error::{DomainError, DomainResult};
pub use principal::Principal;
pub use roles::Role;
