use super::*;
use crate::kv::MemoryStore;

fn repo() -> CatalogRepository {
    CatalogRepository::new(Arc::new(MemoryStore::new()))
}

#[test]
fn catalog_is_scoped_per_vendor() {
    let catalog = repo();
    catalog
        .add_menu_item(MenuItem::new("v1", "Margherita", 1100))
        .unwrap();
    catalog
        .add_menu_item(MenuItem::new("v2", "Pad Thai", 1300))
        .unwrap();

    let v1 = catalog.menu_items("v1").unwrap();
    assert_eq!(v1.len(), 1);
    assert_eq!(v1[0].name, "Margherita");
    assert!(catalog.menu_items("v3").unwrap().is_empty());
}

#[test]
fn categories_come_back_in_display_order() {
    let catalog = repo();
    catalog.add_category(Category::new("v1", "Drinks", 2)).unwrap();
    catalog.add_category(Category::new("v1", "Pizza", 0)).unwrap();
    catalog.add_category(Category::new("v1", "Sides", 1)).unwrap();

    let names: Vec<_> = catalog
        .categories("v1")
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Pizza", "Sides", "Drinks"]);
}

#[test]
fn display_price_pads_cents() {
    assert_eq!(MenuItem::new("v1", "Soda", 205).display_price(), "2.05");
    assert_eq!(MenuItem::new("v1", "Pie", 1200).display_price(), "12.00");
}
