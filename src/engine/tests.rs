use super::*;
use crate::catalog::{Category, MenuItem};
use crate::error::StorefrontError;
use crate::render::Action;
use crate::sections::default_sections;
use crate::vendor::{NewVendor, Vendor, VendorError};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::timeout;

fn joes_pizza(services: &Services) -> Vendor {
    let vendor = services
        .vendors
        .register_vendor(NewVendor {
            slug: "joes-pizza".into(),
            name: "Joe's Pizza".into(),
            email: "joe@example.com".into(),
        })
        .unwrap();
    let pizza = services
        .catalog
        .add_category(Category::new(&vendor.id, "Pizza", 0))
        .unwrap();
    let sides = services
        .catalog
        .add_category(Category::new(&vendor.id, "Sides", 1))
        .unwrap();
    services
        .catalog
        .add_menu_item(MenuItem::new(&vendor.id, "Margherita", 1100).in_category(&pizza.id))
        .unwrap();
    services
        .catalog
        .add_menu_item(MenuItem::new(&vendor.id, "Garlic Knots", 550).in_category(&sides.id))
        .unwrap();
    vendor
}

fn index_of(dashboard: &Dashboard, id: &str) -> usize {
    dashboard
        .sections()
        .iter()
        .position(|s| s.id == id)
        .unwrap()
}

#[tokio::test]
async fn dashboard_edits_reach_a_storefront_in_another_tab() {
    let services = Services::in_memory();
    let vendor = joes_pizza(&services);

    let mut dashboard = Dashboard::open(services.clone(), &vendor.id).unwrap();
    assert_eq!(dashboard.sections(), default_sections());

    let storefront_tab = services.open_tab();
    let page = StorefrontPage::open(services.clone(), &storefront_tab, "joes-pizza", None).unwrap();
    assert_eq!(page.section_ids().len(), 9);
    let mut revisions = page.revisions();

    assert!(dashboard.toggle_section("reviews", false).unwrap());
    let from = index_of(&dashboard, "menu");
    let to = index_of(&dashboard, "categories");
    assert!(dashboard.move_section(from, to).unwrap());

    let stored = dashboard.vendor().template_config("modern").unwrap().clone();
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 9);
    let entry = |id: &str| stored.iter().find(|s| s["id"] == id).unwrap().clone();
    assert_eq!(entry("reviews")["enabled"], json!(false));
    assert!(entry("menu")["order"].as_u64() < entry("categories")["order"].as_u64());

    let expected = [
        "header", "hero", "featured", "menu", "categories", "about", "contact", "footer",
    ];
    timeout(Duration::from_secs(2), async {
        while page.section_ids() != expected {
            revisions.changed().await.unwrap();
        }
    })
    .await
    .expect("storefront re-rendered after the dashboard saved");

    assert!(!page.html().contains("data-section=\"reviews\""));
}

#[test]
fn same_tab_storefront_updates_synchronously() {
    let services = Services::in_memory();
    let vendor = joes_pizza(&services);

    let tab = services.open_tab();
    let page = StorefrontPage::open(services.clone(), &tab, "joes-pizza", None).unwrap();
    let mut dashboard = Dashboard::open_on(services.clone(), tab, &vendor.id).unwrap();

    dashboard.toggle_section("hero", false).unwrap();

    assert!(!page.section_ids().contains(&"hero".to_string()));
}

#[test]
fn noop_edits_do_not_signal() {
    let services = Services::in_memory();
    let vendor = joes_pizza(&services);
    let mut dashboard = Dashboard::open(services, &vendor.id).unwrap();

    let signals = std::sync::Arc::new(AtomicUsize::new(0));
    let seen = signals.clone();
    let _sub = dashboard.bus().on_vendor_updated(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!dashboard.toggle_section("loyalty-banner", false).unwrap());
    assert!(!dashboard.move_section(3, 3).unwrap());
    assert_eq!(signals.load(Ordering::SeqCst), 0);

    assert!(dashboard.toggle_section("about", false).unwrap());
    dashboard.reset_sections().unwrap();
    assert_eq!(signals.load(Ordering::SeqCst), 2);
}

#[test]
fn preview_edits_a_template_without_publishing_it() {
    let services = Services::in_memory();
    let vendor = joes_pizza(&services);
    let tab = services.open_tab();
    let public = StorefrontPage::open(services.clone(), &tab, "joes-pizza", None).unwrap();
    let preview =
        StorefrontPage::open(services.clone(), &tab, "joes-pizza", Some("classic")).unwrap();
    let mut dashboard = Dashboard::open_on(services, tab, &vendor.id).unwrap();

    dashboard.preview_template(Some("classic"));
    assert_eq!(dashboard.template().as_str(), "classic");
    dashboard.toggle_section("featured", false).unwrap();

    assert_eq!(public.template().unwrap().as_str(), "modern");
    assert!(public.section_ids().contains(&"featured".to_string()));
    assert!(!preview.section_ids().contains(&"featured".to_string()));

    dashboard.publish_template().unwrap();
    assert!(dashboard.preview().is_none());
    assert_eq!(public.template().unwrap().as_str(), "classic");
    assert!(!public.section_ids().contains(&"featured".to_string()));
}

#[test]
fn storefront_actions_update_cart_and_category() {
    let services = Services::in_memory();
    joes_pizza(&services);
    let tab = services.open_tab();
    let page = StorefrontPage::open(services, &tab, "joes-pizza", None).unwrap();

    let nodes = page.nodes();
    let add = nodes
        .iter()
        .flat_map(|n| n.find_all(&|node| matches!(node.action(), Some(Action::AddToCart { .. }))))
        .next()
        .and_then(|n| n.action().cloned())
        .unwrap();
    assert!(page.dispatch(&add));
    assert_eq!(page.cart().count(), 1);
    assert!(page.html().contains("Cart (1)"));

    let sides = page
        .nodes()
        .iter()
        .flat_map(|n| n.find_all(&|node| node.text_content() == "Sides" && node.action().is_some()))
        .next()
        .and_then(|n| n.action().cloned())
        .unwrap();
    assert!(page.dispatch(&sides));
    assert!(page.selected_category().is_some());
    let menu = page
        .nodes()
        .into_iter()
        .find(|n| n.section_id() == Some("menu"))
        .unwrap();
    let text = menu.text_content();
    assert!(text.contains("Garlic Knots"));
    assert!(!text.contains("Margherita"));

    page.select_category(None);
    assert!(page.selected_category().is_none());
}

#[test]
fn unknown_slug_renders_not_found() {
    let services = Services::in_memory();
    let tab = services.open_tab();
    let page = StorefrontPage::open(services, &tab, "nobody", None).unwrap();

    assert!(!page.is_found());
    assert!(page.html().contains("Store not found"));
    assert!(!page.dispatch(&Action::SelectCategory { category_id: None }));
}

#[test]
fn dashboard_for_unknown_vendor_fails() {
    let services = Services::in_memory();
    assert!(matches!(
        Dashboard::open(services, "missing"),
        Err(StorefrontError::Vendor(VendorError::NotFound(_)))
    ));
}

#[test]
fn dashboard_refresh_picks_up_other_writers() {
    let services = Services::in_memory();
    let vendor = joes_pizza(&services);
    let mut first = Dashboard::open(services.clone(), &vendor.id).unwrap();
    let mut second = Dashboard::open(services, &vendor.id).unwrap();

    second.toggle_section("contact", false).unwrap();
    assert!(first.sections().iter().all(|s| s.enabled));

    first.refresh().unwrap();
    assert!(!first.sections().iter().find(|s| s.id == "contact").unwrap().enabled);
    assert_eq!(
        first.storefront_url().unwrap().as_str(),
        "http://localhost:1420/store/joes-pizza"
    );
}

#[test]
fn file_backed_services_persist_layouts() {
    let dir = tempfile::tempdir().unwrap();
    let config = crate::config::AppConfig {
        storage: crate::config::StorageBackend::File,
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let vendor = {
        let services = Services::from_config(&config).unwrap();
        let vendor = joes_pizza(&services);
        let mut dashboard = Dashboard::open(services, &vendor.id).unwrap();
        dashboard.toggle_section("reviews", false).unwrap();
        vendor
    };

    let services = Services::from_config(&config).unwrap();
    let dashboard = Dashboard::open(services, &vendor.id).unwrap();
    assert!(!dashboard.sections().iter().find(|s| s.id == "reviews").unwrap().enabled);
}

#[test]
fn storefront_renders_defaults_over_corrupt_storefront_records() {
    use crate::kv::{keys, KvStore, MemoryStore};
    use crate::sections::TemplateId;

    let kv = std::sync::Arc::new(MemoryStore::new());
    let services = Services::new(
        kv.clone(),
        TemplateId::modern(),
        8,
        url::Url::parse("http://localhost:1420").unwrap(),
    );
    let vendor = joes_pizza(&services);
    let mut raw = serde_json::to_value(&vendor).unwrap();
    let tab = services.open_tab();

    let shapes = [
        json!({ "templateConfigs": null }),
        json!({ "templateConfigs": "oops" }),
        json!({ "templateConfigs": [1, 2] }),
        json!({ "template": 5 }),
    ];
    for storefront in shapes {
        raw["storefront"] = storefront.clone();
        kv.set(&keys::vendor(&vendor.id), &raw.to_string()).unwrap();

        let page = StorefrontPage::open(services.clone(), &tab, "joes-pizza", None).unwrap();
        assert!(page.is_found(), "storefront {storefront}");
        assert_eq!(page.template().unwrap().as_str(), "modern");
        let defaults: Vec<String> = default_sections().into_iter().map(|s| s.id).collect();
        assert_eq!(page.section_ids(), defaults, "storefront {storefront}");
    }
}
