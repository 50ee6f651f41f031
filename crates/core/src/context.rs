//! Server-reported authentication context.
//!
//! The backend is the source of truth about registration and role assignment,
//! independent of whether the local credential is cryptographically valid.
//! These types mirror the backend's auth-context response; they are fetched
//! by the session reconciler and never mutated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::principal::Principal;
use crate::roles::Role;

/// Minimal public view of an organization, carried inside role profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub id: Principal,
    pub name: String,
}

/// Role-specific context for a brand owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BrandOwnerProfile {
    /// Organizations the user belongs to.
    pub organizations: Vec<OrganizationSummary>,
    /// The organization currently selected for management, if any.
    pub active_organization: Option<OrganizationSummary>,
}

/// Role-specific context for a reseller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResellerProfile {
    /// Whether the reseller profile is complete and certified.
    pub certified: bool,
    pub certification_code: Option<String>,
    pub certified_at: Option<DateTime<Utc>>,
    /// The brand organization this reseller is associated with.
    pub organization: Option<OrganizationSummary>,
}

/// Assigned role plus its role-specific detail fragment.
///
/// A closed tagged variant: code consuming a profile matches exhaustively
/// instead of probing optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleProfile {
    Admin,
    BrandOwner(BrandOwnerProfile),
    Reseller(ResellerProfile),
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Admin => Role::Admin,
            RoleProfile::BrandOwner(_) => Role::BrandOwner,
            RoleProfile::Reseller(_) => Role::Reseller,
        }
    }
}

/// Server-side truth about the current identity.
///
/// `registered == false` with no profile is the normal state both for
/// anonymous callers and for a freshly authenticated identity that has not
/// completed first-time registration yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub registered: bool,
    pub profile: Option<RoleProfile>,
}

impl AuthContext {
    /// Context reported for identities the backend has no record of.
    pub fn unregistered() -> Self {
        Self {
            registered: false,
            profile: None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(RoleProfile::role)
    }
}

/// Outcome of a product-code verification scan.
///
/// First-class for anonymous callers; the scan flow works logged out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// The code is genuine and had never been scanned before.
    FirstVerification,
    /// The code is genuine but was scanned before.
    MultipleVerification,
    /// The code is unknown or forged.
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_derived_from_profile() {
        let ctx = AuthContext {
            registered: true,
            profile: Some(RoleProfile::Reseller(ResellerProfile::default())),
        };
        assert_eq!(ctx.role(), Some(Role::Reseller));

        assert_eq!(AuthContext::unregistered().role(), None);
    }

    #[test]
    fn profile_serde_round_trip() {
        let profile = RoleProfile::BrandOwner(BrandOwnerProfile {
            organizations: vec![OrganizationSummary {
                id: Principal::new("org-1"),
                name: "Acme".to_string(),
            }],
            active_organization: None,
        });
        let json = serde_json::to_string(&profile).unwrap();
        let back: RoleProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
        assert_eq!(back.role(), Role::BrandOwner);
    }
}
