//! Consistency guard: local credential state versus server truth.
//!
//! A registered session the backend no longer recognizes must never be
//! presented as "logged in" — silent staleness is a security hazard. The
//! guard watches every context-fetch result (it is invoked synchronously by
//! the manager, not tied to any rendering cycle) and tracks one boolean:
//! whether this session was *ever* confirmed registered. Only then do an
//! unregistered context or a non-transient rejection force a logout; the
//! normal first-time flow legitimately reports unregistered and must not
//! trip the guard.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::reconcile::ContextReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    Continue,
    /// Local and server state diverged; tear the session down.
    ForceLogout,
}

#[derive(Debug, Default)]
pub struct ConsistencyGuard {
    was_ever_registered: AtomicBool,
}

impl ConsistencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one reconciliation result.
    pub fn observe(&self, report: &ContextReport) -> GuardVerdict {
        let armed = self.was_ever_registered.load(Ordering::SeqCst);
        match report {
            ContextReport::Applied { registered: true } => {
                self.was_ever_registered.store(true, Ordering::SeqCst);
                GuardVerdict::Continue
            }
            ContextReport::Applied { registered: false } if armed => {
                tracing::error!("backend reports a previously registered session as unregistered");
                GuardVerdict::ForceLogout
            }
            ContextReport::Failed { transient: false } if armed => {
                tracing::error!("backend rejected a previously registered session");
                GuardVerdict::ForceLogout
            }
            // First-time registration flow, transient blips, stale results
            // and anonymous cycles all pass through.
            _ => GuardVerdict::Continue,
        }
    }

    /// Forget history; called on every logout so the next session starts
    /// with a disarmed guard.
    pub fn reset(&self) {
        self.was_ever_registered.store(false, Ordering::SeqCst);
    }

    pub fn was_ever_registered(&self) -> bool {
        self.was_ever_registered.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_before_registration_is_tolerated() {
        let guard = ConsistencyGuard::new();
        assert_eq!(
            guard.observe(&ContextReport::Applied { registered: false }),
            GuardVerdict::Continue
        );
        assert!(!guard.was_ever_registered());
    }

    #[test]
    fn unregistered_after_registration_forces_logout() {
        let guard = ConsistencyGuard::new();
        guard.observe(&ContextReport::Applied { registered: true });
        assert_eq!(
            guard.observe(&ContextReport::Applied { registered: false }),
            GuardVerdict::ForceLogout
        );
    }

    #[test]
    fn rejection_after_registration_forces_logout() {
        let guard = ConsistencyGuard::new();
        guard.observe(&ContextReport::Applied { registered: true });
        assert_eq!(
            guard.observe(&ContextReport::Failed { transient: false }),
            GuardVerdict::ForceLogout
        );
    }

    #[test]
    fn transient_failure_never_forces_logout() {
        let guard = ConsistencyGuard::new();
        guard.observe(&ContextReport::Applied { registered: true });
        assert_eq!(
            guard.observe(&ContextReport::Failed { transient: true }),
            GuardVerdict::Continue
        );
    }

    #[test]
    fn stale_and_skipped_results_are_ignored() {
        let guard = ConsistencyGuard::new();
        guard.observe(&ContextReport::Applied { registered: true });
        assert_eq!(guard.observe(&ContextReport::Stale), GuardVerdict::Continue);
        assert_eq!(
            guard.observe(&ContextReport::Skipped),
            GuardVerdict::Continue
        );
    }

    #[test]
    fn reset_disarms_the_guard() {
        let guard = ConsistencyGuard::new();
        guard.observe(&ContextReport::Applied { registered: true });
        guard.reset();
        assert_eq!(
            guard.observe(&ContextReport::Applied { registered: false }),
            GuardVerdict::Continue
        );
    }
}
