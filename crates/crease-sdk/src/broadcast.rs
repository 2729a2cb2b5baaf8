use tokio::sync::broadcast;
use tracing::debug;

use crease_projection::Snapshot;

/// A broadcast channel receiver for projected snapshots.
pub type SnapshotStream = broadcast::Receiver<Snapshot>;

/// Fan-out bus delivering every committed snapshot to subscribers.
///
/// The bus is fire-and-forget by design: a slow or absent subscriber can
/// lag or miss frames (they reconcile through the get-snapshot path, which
/// serves the same projector output), and a delivery failure never
/// un-commits the ledger change that produced the snapshot.
pub struct SnapshotBus {
    sender: broadcast::Sender<Snapshot>,
}

impl SnapshotBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a subscriber. Each receiver sees every snapshot published
    /// after this call, subject to channel capacity.
    pub fn subscribe(&self) -> SnapshotStream {
        self.sender.subscribe()
    }

    /// Publish a snapshot to all current subscribers. Returns how many
    /// receivers it reached.
    pub fn publish(&self, snapshot: Snapshot) -> usize {
        match self.sender.send(snapshot) {
            Ok(reached) => reached,
            Err(_) => {
                debug!("snapshot published with no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SnapshotBus {
    fn default() -> Self {
        Self::new(64)
    }
}
