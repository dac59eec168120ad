//! Change signalling between tabs of one origin.
//!
//! A [`SyncHub`] is shared by the whole application; each tab (dashboard or
//! storefront window) opens its own [`SyncBus`] on it. A signal is only a
//! prompt to re-read the store: it is best-effort and unordered across tabs.

pub mod bus;
pub mod hub;

pub use bus::{Handler, SignalSource, Subscription, SyncBus, TabId, VendorSignal};
pub use hub::{StorageEvent, SyncHub, VENDOR_UPDATED_KEY};

#[cfg(test)]
mod tests;
