//! Shutdown signalling between a transport and its serve task.

use tokio::sync::broadcast;

/// Graceful-stop signal for a serving transport.
///
/// The serve task subscribes before it starts accepting; `trigger` tells it
/// to drain in-flight requests and exit. Triggering with no subscribers or
/// more than once is harmless, which keeps `Transport::stop` idempotent.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the signal. Must happen before the serve task runs.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Request shutdown. Safe to call repeatedly.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
