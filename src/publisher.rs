// Single-writer / multi-reader handoff of monitor snapshots

use crate::models::MonitorSnapshot;
use crate::state::MonitorState;
use std::sync::Arc;
use tokio::sync::watch;

/// Write half, owned by the stream consumer.
///
/// Each publish replaces the whole snapshot, so readers see either the state
/// before a record or the state after it.
#[derive(Debug)]
pub struct StatePublisher {
    tx: watch::Sender<Arc<MonitorSnapshot>>,
}

/// Read half, cloned into every request handler.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<MonitorSnapshot>>,
}

/// Creates a publisher/reader pair seeded with `initial`'s snapshot.
pub fn channel(initial: &MonitorState) -> (StatePublisher, SnapshotReader) {
    let (tx, rx) = watch::channel(Arc::new(initial.snapshot()));
    (StatePublisher { tx }, SnapshotReader { rx })
}

impl StatePublisher {
    pub fn publish(&self, state: &MonitorState) {
        // send_replace stores the value even when every reader is gone.
        self.tx.send_replace(Arc::new(state.snapshot()));
    }

    pub fn reader_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl SnapshotReader {
    /// Snapshot as of the last publish. Never blocks on the consumer.
    pub fn current_snapshot(&self) -> Arc<MonitorSnapshot> {
        self.rx.borrow().clone()
    }

    /// Waits for the next publish. Errors once the publisher is dropped.
    pub async fn changed(&mut self) -> Result<Arc<MonitorSnapshot>, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
