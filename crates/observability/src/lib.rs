//! `veritag-observability` — logging/tracing bootstrap.

pub mod tracing;

pub use tracing::{init, init_for_tests};
