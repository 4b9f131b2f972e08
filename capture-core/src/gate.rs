//! One-shot "designer ready" signal.
//!
//! The designer's canvas comes up asynchronously relative to script load.
//! Instead of polling for it, the initialization code opens a [`ReadyGate`]
//! once, and every caller that needs design data awaits it before calling
//! the assembler.
//!
//! ```text
//! designer init ──mark_ready(value)──► ReadyGate ──wait()──► save / autosave / cart
//! ```

use tokio::sync::watch;

use crate::{CaptureError, CaptureResult};

/// A gate that opens exactly once and then stays open.
#[derive(Debug)]
pub struct ReadyGate<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Default for ReadyGate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ReadyGate<T> {
    /// Create a closed gate.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Open the gate with `value`.
    ///
    /// Returns `false`, leaving the first value in place, if the gate was
    /// already open.
    pub fn mark_ready(&self, value: T) -> bool {
        let opened = self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
            true
        });
        if opened {
            tracing::info!("Designer ready");
        } else {
            tracing::debug!("Ready gate already open, ignoring repeated signal");
        }
        opened
    }

    /// Whether the gate is open.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// The ready value, if the gate is open.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// A handle that can wait on the gate from another task.
    #[must_use]
    pub fn waiter(&self) -> ReadyWaiter<T> {
        ReadyWaiter {
            rx: self.tx.subscribe(),
        }
    }

    /// Wait until the gate opens and return its value.
    pub async fn wait(&self) -> T {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(value) = rx.borrow_and_update().clone() {
                return value;
            }
            // The sender lives in `self`, so the channel stays open.
            let _ = rx.changed().await;
        }
    }
}

/// A detached waiter for a [`ReadyGate`].
#[derive(Debug, Clone)]
pub struct ReadyWaiter<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> ReadyWaiter<T> {
    /// Wait until the gate opens and return its value.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::GateClosed`] if the gate is dropped before it
    /// opens.
    pub async fn wait(mut self) -> CaptureResult<T> {
        let value = self
            .rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| CaptureError::GateClosed)?;
        value.clone().ok_or(CaptureError::GateClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn waiters_resolve_when_marked() {
        let gate = ReadyGate::<u32>::new();
        let waiter = gate.waiter();
        let handle = tokio::spawn(waiter.wait());

        tokio::task::yield_now().await;
        assert!(!gate.is_ready());
        assert!(gate.mark_ready(7));

        let value = handle.await.expect("task joins").expect("gate opened");
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn later_waiters_resolve_immediately() {
        let gate = ReadyGate::new();
        gate.mark_ready("designer");
        let value = tokio::time::timeout(Duration::from_millis(50), gate.wait())
            .await
            .expect("should not block");
        assert_eq!(value, "designer");
    }

    #[tokio::test]
    async fn first_signal_wins() {
        let gate = ReadyGate::new();
        assert!(gate.mark_ready(1));
        assert!(!gate.mark_ready(2));
        assert_eq!(gate.value(), Some(1));
        assert_eq!(gate.waiter().wait().await.expect("open"), 1);
    }

    #[tokio::test]
    async fn dropped_gate_fails_waiters() {
        let gate = ReadyGate::<u32>::new();
        let waiter = gate.waiter();
        drop(gate);
        assert!(matches!(waiter.wait().await, Err(CaptureError::GateClosed)));
    }
}
