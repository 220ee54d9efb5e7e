//! Recovery timer
//!
//! Waits out a [`RecoveryTicket`]'s delay on a tokio task and delivers the
//! ticket over a channel. The owner of the controller hands it to
//! [`on_recovery_due`](crate::PlaybackController::on_recovery_due).

use crate::recovery::RecoveryTicket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Keeps at most one recovery attempt waiting
#[derive(Debug)]
pub struct RecoveryTimer {
    tx: mpsc::UnboundedSender<RecoveryTicket>,
    pending: Option<JoinHandle<()>>,
}

impl RecoveryTimer {
    /// Create a timer and the receiver due tickets arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RecoveryTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, pending: None }, rx)
    }

    /// Deliver `ticket` after its delay, replacing any waiting ticket
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, ticket: RecoveryTicket) {
        self.cancel();
        let tx = self.tx.clone();
        debug!(delay_ms = ticket.delay().as_millis() as u64, "Recovery timer armed");

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(ticket.delay()).await;
            // Receiver gone means the application is shutting down
            let _ = tx.send(ticket);
        }));
    }

    /// Drop the waiting ticket, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Check whether a ticket is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RecoveryTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
