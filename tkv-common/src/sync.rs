//! # Emitter/Awaiter Signal
//!
//! Purpose: Provide a one-shot broadcast gate for sequencing tasks, e.g. a test
//! harness waiting for a listener to come up, or an application loop waiting
//! for a shutdown request.
//!
//! ## Design Principles
//! 1. **Single Write**: `Emitter::emit` consumes the emitter, so a second emit
//!    cannot be written.
//! 2. **Many Readers**: `Awaiter` is cheap to clone; every clone resolves once
//!    the gate is open, whether it started waiting before or after the emit.
//! 3. **Latching**: The gate never closes again once opened.
//!
//! ## Notes
//! - Dropping an `Emitter` without calling `emit` leaves every waiter pending.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

struct Gate {
    emitted: AtomicBool,
    notify: Notify,
}

/// Write side of the signal. Single-use.
pub struct Emitter {
    gate: Arc<Gate>,
}

/// Read side of the signal.
#[derive(Clone)]
pub struct Awaiter {
    gate: Arc<Gate>,
}

/// Creates a connected emitter/awaiter pair.
pub fn emitter_awaiter() -> (Emitter, Awaiter) {
    let gate = Arc::new(Gate {
        emitted: AtomicBool::new(false),
        notify: Notify::new(),
    });
    (
        Emitter { gate: gate.clone() },
        Awaiter { gate },
    )
}

impl Emitter {
    /// Opens the gate and wakes every waiter.
    pub fn emit(self) {
        self.gate.emitted.store(true, Ordering::Release);
        self.gate.notify.notify_waiters();
    }
}

impl Awaiter {
    /// Waits until the paired emitter has fired.
    pub async fn wait(&self) {
        loop {
            let notified = self.gate.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so an emit in between is not lost.
            notified.as_mut().enable();

            if self.is_emitted() {
                return;
            }
            notified.await;
        }
    }

    /// Returns true once the emitter has fired.
    pub fn is_emitted(&self) -> bool {
        self.gate.emitted.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::timeout;

    #[tokio::test]
    async fn waiter_resolves_after_emit() {
        let (emit, wait) = emitter_awaiter();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            emit.emit();
        });

        timeout(Duration::from_secs(5), wait.wait())
            .await
            .expect("waiter should resolve");
        assert!(wait.is_emitted());
    }

    #[tokio::test]
    async fn late_waiter_resolves_immediately() {
        let (emit, wait) = emitter_awaiter();
        assert!(!wait.is_emitted());
        emit.emit();

        timeout(Duration::from_millis(100), wait.wait())
            .await
            .expect("gate stays open after emit");
    }

    #[tokio::test]
    async fn all_waiters_resolve_together() {
        let (emit, wait) = emitter_awaiter();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let wait = wait.clone();
                tokio::spawn(async move { wait.wait().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(20)).await;
        emit.emit();

        for handle in handles {
            timeout(Duration::from_secs(5), handle)
                .await
                .expect("waiter should resolve")
                .expect("waiter task should not panic");
        }
    }

    #[tokio::test]
    async fn pending_without_emit() {
        let (_emit, wait) = emitter_awaiter();
        let result = timeout(Duration::from_millis(50), wait.wait()).await;
        assert!(result.is_err());
    }
}
