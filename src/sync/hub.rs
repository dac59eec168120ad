use crate::sync::TabId;
use tokio::sync::broadcast;
use tracing::debug;

/// Key carried by vendor-record change events.
pub const VENDOR_UPDATED_KEY: &str = "vendor-updated";

/// A storage-change event as other tabs of the origin observe it. Only the
/// key and the writing tab are carried; listeners re-read the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: TabId,
}

/// Origin-wide fan-out of storage-change events, shared by every tab.
#[derive(Clone)]
pub struct SyncHub {
    sender: broadcast::Sender<StorageEvent>,
}

impl SyncHub {
    /// `capacity` bounds how many events a slow tab may fall behind before it
    /// starts missing individual events (it still gets one wake-up).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.sender.subscribe()
    }

    /// Returns how many tabs were listening.
    pub fn publish(&self, event: StorageEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!(key = %event.key, "no tabs listening");
                0
            }
        }
    }

    pub fn tab_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SyncHub {
    fn default() -> Self {
        Self::new(64)
    }
}
