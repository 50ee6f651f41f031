//! `veritag-session` — client session state machine.
//!
//! This crate owns the single source of truth for "who is logged in": the
//! [`SessionStore`] holds the current principal and its bound service client
//! as an atomic pair, the [`SessionReconciler`] is the sole writer of
//! server-confirmed session truth, the [`ConsistencyGuard`] forces logout
//! when local and server state diverge, and the authorization gate turns a
//! session snapshot into a routing decision. [`SessionManager`] wires these
//! together behind `login` / `logout` / `refetch`.

pub mod error;
pub mod gate;
pub mod guard;
pub mod manager;
pub mod reconcile;
pub mod store;

pub use error::SessionError;
pub use gate::{AccessDecision, decide};
pub use guard::{ConsistencyGuard, GuardVerdict};
pub use manager::SessionManager;
pub use reconcile::{ContextReport, SessionReconciler};
pub use store::{SessionPhase, SessionSnapshot, SessionStore};
