//! Opaque principal identifier.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stable identifier of an authenticated identity, as issued by the
/// credential provider.
///
/// The textual form is opaque to this client: it is compared, displayed and
/// forwarded, never interpreted. Anonymous access is modelled as the *absence*
/// of a principal (`Option<Principal>`), not as a sentinel value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Wrap provider-issued principal text.
    ///
    /// Prefer `FromStr` for untrusted input; this constructor is for values
    /// that already came out of the provider or the backend.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Principal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Principal {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("Principal: empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}
