//! Session-level error taxonomy.
//!
//! Raw provider/transport errors are translated into these kinds at each
//! component boundary; dependent UI never sees anything else. "Unregistered"
//! is deliberately absent: an authenticated identity with no backend record
//! is a phase of the state machine, not a failure.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The credential provider itself failed (network, outage). Surfaced to
    /// the user only for an interactive login attempt.
    #[error("credential provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The backend no longer recognizes a previously registered identity.
    /// Always fatal to the session; handled by forced logout, never shown as
    /// a blocking error.
    #[error("session no longer recognized by the backend")]
    Inconsistent,

    /// A context fetch failed without implicating a previously registered
    /// session: a transport blip, or a rejection before any registration was
    /// confirmed. Shown as a dismissible banner; does not force logout.
    #[error("could not refresh session context: {0}")]
    TransientFetch(String),
}
