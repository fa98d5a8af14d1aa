//! In-process gate around welfare-check dispatch.
//!
//! A mashed dashboard test button or an overlapping cron trigger must not
//! interleave two alarm rounds. The HTTP handler try-acquires and answers
//! 409 when a check is already running; the CLI waits for its turn.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Single-permit gate serializing welfare checks within the process.
#[derive(Clone)]
pub struct CheckGate {
    permit: Arc<Semaphore>,
}

impl CheckGate {
    pub fn new() -> Self {
        Self {
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    /// Wait until no other check is running, then hold the gate.
    pub async fn begin(&self) -> OwnedSemaphorePermit {
        self.permit
            .clone()
            .acquire_owned()
            .await
            .expect("check gate semaphore is never closed")
    }

    /// Claim the gate only if it is free.
    pub fn try_begin(&self) -> Option<OwnedSemaphorePermit> {
        self.permit.clone().try_acquire_owned().ok()
    }

    /// Whether a check is currently in flight.
    pub fn is_checking(&self) -> bool {
        self.permit.available_permits() == 0
    }
}

impl Default for CheckGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_caller_is_turned_away_while_held() {
        let gate = CheckGate::new();
        let held = gate.try_begin();
        assert!(held.is_some());
        assert!(gate.is_checking());
        assert!(gate.try_begin().is_none());

        drop(held);
        assert!(!gate.is_checking());
        assert!(gate.try_begin().is_some());
    }

    #[tokio::test]
    async fn begin_waits_for_release() {
        let gate = CheckGate::new();
        let held = gate.begin().await;

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _p = gate.begin().await;
            })
        };
        // The waiter cannot finish while the permit is held.
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(held);
        waiter.await.unwrap();
        assert!(!gate.is_checking());
    }

    #[tokio::test]
    async fn clones_share_the_permit() {
        let gate = CheckGate::new();
        let other = gate.clone();
        let _held = gate.begin().await;
        assert!(other.is_checking());
        assert!(other.try_begin().is_none());
    }
}
