//! Delivery of follow-up transitions from async work.
//!
//! Tasks hold an [`ActionSender`]; the owner of the store drains the
//! [`ActionReceiver`] so every transition still goes through one writer, in
//! arrival order.

use aura_core::{Action, Dispatch};
use tokio::sync::mpsc;

/// Create a connected sender/receiver pair.
#[must_use]
pub fn action_channel() -> (ActionSender, ActionReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ActionSender { tx }, ActionReceiver { rx })
}

/// Sending half, cloned into async tasks.
#[derive(Debug, Clone)]
pub struct ActionSender {
    tx: mpsc::UnboundedSender<Action>,
}

impl ActionSender {
    /// Queue an action. Returns `false` if the receiver is gone.
    pub fn send(&self, action: Action) -> bool {
        let name = action.name();
        if self.tx.send(action).is_err() {
            tracing::debug!(action = name, "Action receiver closed, dropping action");
            return false;
        }
        true
    }
}

/// Receiving half, owned next to the store.
#[derive(Debug)]
pub struct ActionReceiver {
    rx: mpsc::UnboundedReceiver<Action>,
}

impl ActionReceiver {
    /// Wait for the next action.
    pub async fn recv(&mut self) -> Option<Action> {
        self.rx.recv().await
    }

    /// Take the next queued action without waiting.
    pub fn try_recv(&mut self) -> Option<Action> {
        self.rx.try_recv().ok()
    }

    /// Dispatch every queued action into `target`, in order. Returns how
    /// many were applied.
    pub fn drain_into<D: Dispatch + ?Sized>(&mut self, target: &mut D) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.rx.try_recv() {
            target.dispatch(action);
            applied += 1;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::Store;

    #[test]
    fn test_drain_applies_in_order() {
        let (tx, mut rx) = action_channel();
        let mut store = Store::new();

        assert!(tx.send(Action::SetPadding(10)));
        assert!(tx.send(Action::SetPadding(20)));
        assert!(tx.send(Action::AddTextOverlay));

        assert_eq!(rx.drain_into(&mut store), 3);
        assert_eq!(store.document().padding, 20);
        assert_eq!(store.document().text_overlays.len(), 1);
        assert_eq!(rx.drain_into(&mut store), 0);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = action_channel();
        drop(rx);
        assert!(!tx.send(Action::Logout));
    }

    #[tokio::test]
    async fn test_recv_from_task() {
        let (tx, mut rx) = action_channel();
        tokio::spawn(async move {
            tx.send(Action::Logout);
        });
        assert_eq!(rx.recv().await, Some(Action::Logout));
    }
}
