use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn counter(bus: &SyncBus) -> (Arc<AtomicUsize>, Subscription) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let sub = bus.on_vendor_updated(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (count, sub)
}

fn channel(bus: &SyncBus) -> (mpsc::UnboundedReceiver<VendorSignal>, Subscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sub = bus.on_vendor_updated(move |signal| {
        let _ = tx.send(signal);
    });
    (rx, sub)
}

#[test]
fn same_tab_handlers_run_synchronously_without_runtime() {
    let hub = SyncHub::default();
    let bus = SyncBus::connect(&hub);
    let (count, _sub) = counter(&bus);

    bus.notify_vendor_updated();
    bus.notify_vendor_updated();

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn dropping_subscription_unregisters() {
    let hub = SyncHub::default();
    let bus = SyncBus::connect(&hub);
    let (count, sub) = counter(&bus);
    assert_eq!(bus.handler_count(), 1);

    sub.unsubscribe();
    bus.notify_vendor_updated();

    assert_eq!(bus.handler_count(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn other_tabs_receive_storage_events() {
    let hub = SyncHub::new(8);
    let dashboard = SyncBus::connect(&hub);
    let storefront = SyncBus::connect(&hub);
    let (mut local, _a) = channel(&dashboard);
    let (mut remote, _b) = channel(&storefront);

    dashboard.notify_vendor_updated();

    assert_eq!(
        local.try_recv().unwrap().source,
        SignalSource::SameTab,
        "same-tab delivery happens before notify returns"
    );
    let signal = timeout(Duration::from_secs(1), remote.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(signal.source, SignalSource::OtherTab);
}

#[tokio::test]
async fn origin_tab_does_not_get_its_own_event_back() {
    let hub = SyncHub::new(8);
    let dashboard = SyncBus::connect(&hub);
    let storefront = SyncBus::connect(&hub);
    let (mut local, _a) = channel(&dashboard);
    let (mut remote, _b) = channel(&storefront);

    dashboard.notify_vendor_updated();
    timeout(Duration::from_secs(1), remote.recv())
        .await
        .unwrap()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(local.try_recv().unwrap().source, SignalSource::SameTab);
    assert!(local.try_recv().is_err());
}

#[tokio::test]
async fn lagging_tab_still_wakes_up() {
    let hub = SyncHub::new(1);
    let storefront = SyncBus::connect(&hub);
    let (mut remote, _sub) = channel(&storefront);

    for _ in 0..5 {
        hub.publish(StorageEvent {
            key: VENDOR_UPDATED_KEY.to_string(),
            origin: TabId::new(),
        });
    }

    let signal = timeout(Duration::from_secs(1), remote.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(signal.source, SignalSource::OtherTab);
}

#[tokio::test]
async fn unrelated_keys_are_ignored() {
    let hub = SyncHub::new(8);
    let storefront = SyncBus::connect(&hub);
    let (mut remote, _sub) = channel(&storefront);

    hub.publish(StorageEvent {
        key: "cart".into(),
        origin: TabId::new(),
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(remote.try_recv().is_err());
}

#[test]
fn publish_without_listeners_is_harmless() {
    let hub = SyncHub::new(4);
    assert_eq!(hub.tab_count(), 0);
    assert_eq!(
        hub.publish(StorageEvent {
            key: VENDOR_UPDATED_KEY.into(),
            origin: TabId::new(),
        }),
        0
    );
}

#[test]
fn tab_opened_inside_a_runtime_listens_across_tabs() {
    tokio_test::block_on(async {
        let hub = SyncHub::new(4);
        let a = SyncBus::connect(&hub);
        let b = SyncBus::connect(&hub);
        assert_eq!(hub.tab_count(), 2);
        assert_ne!(a.tab(), b.tab());

        let (mut remote, _sub) = channel(&b);
        a.notify_vendor_updated();
        let signal = timeout(Duration::from_secs(1), remote.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signal.source, SignalSource::OtherTab);
    });
}
