//! Role identifiers used for authorization decisions.

use serde::{Deserialize, Serialize};

/// Role assigned to a registered user.
///
/// This is a closed set: the backend assigns at most one of these per user,
/// and routing decisions match on it exhaustively. "No role yet" is
/// represented as `Option<Role>` (a user mid-registration), not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    BrandOwner,
    Reseller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::BrandOwner => "BrandOwner",
            Role::Reseller => "Reseller",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
