use crate::sync::hub::{StorageEvent, SyncHub, VENDOR_UPDATED_KEY};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Identity of one tab (window) of the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Where a vendor-updated signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    SameTab,
    OtherTab,
}

/// "Some vendor record changed." Carries no vendor data; listeners re-read
/// the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorSignal {
    pub source: SignalSource,
}

pub type Handler = Arc<dyn Fn(VendorSignal) + Send + Sync>;

type HandlerMap = Mutex<BTreeMap<u64, Handler>>;

/// Per-tab publish/subscribe endpoint for vendor-record changes.
///
/// Handlers registered on this bus run synchronously inside
/// [`notify_vendor_updated`](Self::notify_vendor_updated) for same-tab
/// changes, and from the tab's listener task for changes made in other tabs.
pub struct SyncBus {
    tab: TabId,
    hub: SyncHub,
    handlers: Arc<HandlerMap>,
    next_id: AtomicU64,
    listener: Option<JoinHandle<()>>,
}

impl SyncBus {
    /// Opens a tab on `hub`. Cross-tab delivery needs a Tokio runtime; without
    /// one the bus still delivers same-tab signals.
    pub fn connect(hub: &SyncHub) -> Self {
        let tab = TabId::new();
        let handlers: Arc<HandlerMap> = Arc::new(Mutex::new(BTreeMap::new()));

        let listener = match Handle::try_current() {
            Ok(runtime) => {
                // Subscribe before returning so no event published after
                // `connect` can be missed.
                let events = hub.subscribe();
                Some(runtime.spawn(listen(tab, events, Arc::downgrade(&handlers))))
            }
            Err(_) => {
                debug!(%tab, "no async runtime, cross-tab listener not started");
                None
            }
        };

        Self {
            tab,
            hub: hub.clone(),
            handlers,
            next_id: AtomicU64::new(0),
            listener,
        }
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Signals that some vendor record was written: runs this tab's handlers,
    /// then raises a storage-change event for every other tab.
    pub fn notify_vendor_updated(&self) {
        debug!(tab = %self.tab, "vendor updated");
        deliver(
            &self.handlers,
            VendorSignal {
                source: SignalSource::SameTab,
            },
        );
        self.hub.publish(StorageEvent {
            key: VENDOR_UPDATED_KEY.to_string(),
            origin: self.tab,
        });
    }

    /// Registers `handler` until the returned [`Subscription`] is dropped.
    pub fn on_vendor_updated<F>(&self, handler: F) -> Subscription
    where
        F: Fn(VendorSignal) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.insert(id, Arc::new(handler));
        }
        Subscription {
            id,
            handlers: Arc::downgrade(&self.handlers),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Drop for SyncBus {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

/// Keeps a handler registered; dropping it unsubscribes.
#[must_use = "dropping the subscription unregisters the handler"]
pub struct Subscription {
    id: u64,
    handlers: Weak<HandlerMap>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handlers) = self.handlers.upgrade() {
            if let Ok(mut handlers) = handlers.lock() {
                handlers.remove(&self.id);
            }
        }
    }
}

fn deliver(handlers: &HandlerMap, signal: VendorSignal) {
    // Handlers may subscribe or unsubscribe while running.
    let snapshot: Vec<Handler> = match handlers.lock() {
        Ok(handlers) => handlers.values().cloned().collect(),
        Err(_) => return,
    };
    for handler in snapshot {
        handler(signal);
    }
}

async fn listen(tab: TabId, mut events: Receiver<StorageEvent>, handlers: Weak<HandlerMap>) {
    loop {
        match events.recv().await {
            Ok(event) if event.origin == tab || event.key != VENDOR_UPDATED_KEY => continue,
            Ok(_) => {}
            Err(RecvError::Lagged(missed)) => {
                // Events are interchangeable; one re-read covers the missed ones.
                debug!(%tab, missed, "sync listener lagged");
            }
            Err(RecvError::Closed) => break,
        }
        let Some(handlers) = handlers.upgrade() else {
            break;
        };
        deliver(
            &handlers,
            VendorSignal {
                source: SignalSource::OtherTab,
            },
        );
    }
}
