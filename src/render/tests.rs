use super::*;
use crate::catalog::{Category, MenuItem};
use crate::sections::{default_sections, SectionEntry};
use crate::vendor::{StorefrontSettings, Vendor};
use chrono::Utc;
use serde_json::{json, Map};
use std::sync::{Arc, Mutex};

fn vendor() -> Vendor {
    Vendor {
        id: "v1".into(),
        slug: "joes-pizza".into(),
        name: "Joe's Pizza".into(),
        email: "joe@example.com".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        storefront: StorefrontSettings::default(),
        extra: Map::new(),
    }
}

fn menu() -> Vec<MenuItem> {
    (0..8)
        .map(|i| {
            let item = MenuItem::new("v1", format!("Pizza {i}"), 1000 + i);
            if i % 2 == 0 {
                item.in_category("pizza")
            } else {
                item.in_category("sides")
            }
        })
        .collect()
}

fn categories() -> Vec<Category> {
    vec![
        Category {
            id: "pizza".into(),
            vendor_id: "v1".into(),
            name: "Pizza".into(),
            order: 0,
        },
        Category {
            id: "sides".into(),
            vendor_id: "v1".into(),
            name: "Sides".into(),
            order: 1,
        },
    ]
}

fn section_ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().filter_map(Node::section_id).collect()
}

fn has_section(nodes: &[Node], id: &str) -> bool {
    nodes
        .iter()
        .any(|n| !n.find_all(&|node| node.section_id() == Some(id)).is_empty())
}

#[test]
fn renders_enabled_sections_in_order() {
    let vendor = vendor();
    let items = menu();
    let cats = categories();
    let ctx = RenderContext::new(&vendor, &items, &cats);

    let mut sections = default_sections();
    sections.reverse();
    let nodes = SectionRenderer::default().render(&sections, &ctx);

    assert_eq!(
        section_ids(&nodes),
        [
            "header",
            "hero",
            "featured",
            "categories",
            "menu",
            "about",
            "reviews",
            "contact",
            "footer"
        ]
    );
}

#[test]
fn disabled_section_is_absent() {
    let vendor = vendor();
    let ctx = RenderContext::new(&vendor, &[], &[]);
    let mut sections = default_sections();
    sections
        .iter_mut()
        .find(|s| s.id == "reviews")
        .unwrap()
        .enabled = false;

    let nodes = SectionRenderer::default().render(&sections, &ctx);

    assert_eq!(nodes.len(), 8);
    assert!(!has_section(&nodes, "reviews"));
    assert!(!to_html(&nodes).contains("data-section=\"reviews\""));
}

#[test]
fn unknown_section_renders_placeholder_and_rendering_continues() {
    let vendor = vendor();
    let ctx = RenderContext::new(&vendor, &[], &[]);
    let sections = vec![
        SectionEntry::new("hero", "Hero", 0),
        SectionEntry::new("loyalty-banner", "Loyalty Banner", 1),
        SectionEntry::new("footer", "Footer", 2),
    ];

    let nodes = SectionRenderer::default().render(&sections, &ctx);

    assert_eq!(section_ids(&nodes), ["hero", "loyalty-banner", "footer"]);
    let placeholder = &nodes[1];
    assert_eq!(placeholder.get_attr("data-placeholder"), Some("true"));
    let text = placeholder.text_content();
    assert!(text.contains("Loyalty Banner"));
    assert!(text.contains("loyalty-banner"));
}

#[test]
fn empty_renderer_falls_back_for_everything() {
    let vendor = vendor();
    let ctx = RenderContext::new(&vendor, &[], &[]);
    let nodes = SectionRenderer::empty().render(&default_sections(), &ctx);

    assert_eq!(nodes.len(), 9);
    assert!(nodes
        .iter()
        .all(|n| n.get_attr("data-placeholder") == Some("true")));
}

#[test]
fn registered_unit_replaces_builtin() {
    fn banner(
        entry: &SectionEntry,
        _: &crate::render::content::TitledContent,
        _: &RenderContext<'_>,
    ) -> Node {
        Node::element("section")
            .attr("data-section", entry.id.clone())
            .child(Node::text("custom"))
    }

    let mut renderer = SectionRenderer::default();
    renderer.register("loyalty-banner", unit(banner));
    assert!(renderer.is_registered("loyalty-banner"));

    let vendor = vendor();
    let ctx = RenderContext::new(&vendor, &[], &[]);
    let nodes = renderer.render(&[SectionEntry::new("loyalty-banner", "Loyalty", 0)], &ctx);
    assert_eq!(nodes[0].text_content(), "custom");
}

#[test]
fn featured_takes_first_six_available_items() {
    let vendor = vendor();
    let mut items = menu();
    items[0].available = false;
    let ctx = RenderContext::new(&vendor, &items, &[]);

    let nodes =
        SectionRenderer::default().render(&[SectionEntry::new("featured", "Featured", 0)], &ctx);
    let cards = nodes[0].find_all(&|n| n.get_attr("data-item").is_some());

    assert_eq!(cards.len(), 6);
    assert_eq!(cards[0].get_attr("data-item"), Some(items[1].id.as_str()));
}

#[test]
fn hero_uses_content_overrides_and_defaults() {
    let vendor = vendor();
    let ctx = RenderContext::new(&vendor, &[], &[]);
    let renderer = SectionRenderer::default();

    let plain = renderer.render(&[SectionEntry::new("hero", "Hero", 0)], &ctx);
    assert!(plain[0].text_content().contains("Welcome to Joe's Pizza"));

    let mut custom = SectionEntry::new("hero", "Hero", 0);
    custom.content.insert("title".into(), json!("Slices since 1987"));
    let nodes = renderer.render(&[custom], &ctx);
    assert!(nodes[0].text_content().contains("Slices since 1987"));

    let mut broken = SectionEntry::new("hero", "Hero", 0);
    broken.content.insert("title".into(), json!(42));
    let nodes = renderer.render(&[broken], &ctx);
    assert!(nodes[0].text_content().contains("Welcome to Joe's Pizza"));
}

#[test]
fn wrong_typed_content_field_keeps_its_siblings() {
    let vendor = vendor();
    let ctx = RenderContext::new(&vendor, &[], &[]);

    let mut hero = SectionEntry::new("hero", "Hero", 0);
    hero.content.insert("title".into(), json!("Hot slices"));
    hero.content.insert("subtitle".into(), json!(42));
    let nodes = SectionRenderer::default().render(&[hero], &ctx);

    let text = nodes[0].text_content();
    assert!(text.contains("Hot slices"));
    assert!(text.contains("Fresh food, made to order"));
}

#[test]
fn wrong_typed_setting_keeps_its_siblings() {
    let vendor = vendor();
    let items = menu();
    let ctx = RenderContext::new(&vendor, &items, &[]);

    let mut featured = SectionEntry::new("featured", "Featured", 0);
    featured.settings.insert("columns".into(), json!(300));
    featured.settings.insert("limit".into(), json!(2));
    let nodes = SectionRenderer::default().render(&[featured], &ctx);

    let cards = nodes[0].find_all(&|n| n.get_attr("data-item").is_some());
    assert_eq!(cards.len(), 2);
    let grid = nodes[0].find_all(&|n| n.get_attr("data-columns").is_some());
    assert_eq!(grid[0].get_attr("data-columns"), Some("3"));
}

#[test]
fn list_content_drops_only_the_bad_elements() {
    let vendor = vendor();
    let ctx = RenderContext::new(&vendor, &[], &[]);

    let mut reviews = SectionEntry::new("reviews", "Reviews", 0);
    reviews.content.insert(
        "reviews".into(),
        json!([
            { "author": "Ana", "rating": 5, "text": "Best crust in town" },
            "not a review",
            { "author": "Ben", "rating": "five", "text": "Great knots" }
        ]),
    );
    let nodes = SectionRenderer::default().render(&[reviews], &ctx);

    let text = nodes[0].text_content();
    assert!(text.contains("Best crust in town"));
    assert!(text.contains("Great knots"));
    assert!(!text.contains("not a review"));
}

#[test]
fn menu_filters_by_selected_category_and_embeds_cart() {
    let vendor = vendor();
    let items = menu();
    let cats = categories();
    let mut ctx = RenderContext::new(&vendor, &items, &cats);
    ctx.selected_category = Some("sides");
    ctx.cart_node = Node::element("aside").attr("data-cart", "yes");

    let nodes = SectionRenderer::default().render(&[SectionEntry::new("menu", "Menu", 0)], &ctx);
    let cards = nodes[0].find_all(&|n| n.get_attr("data-item").is_some());

    assert_eq!(cards.len(), 4);
    assert!(!nodes[0].find_all(&|n| n.get_attr("data-cart").is_some()).is_empty());
}

#[test]
fn actions_route_to_context_callbacks() {
    let vendor = vendor();
    let items = menu();
    let cats = categories();
    let added: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let selected: Arc<Mutex<Option<Option<String>>>> = Arc::new(Mutex::new(None));

    let mut ctx = RenderContext::new(&vendor, &items, &cats);
    let sink = added.clone();
    ctx.on_add_to_cart = Arc::new(move |item: MenuItem| sink.lock().unwrap().push(item.id));
    let sink = selected.clone();
    ctx.on_category_change = Arc::new(move |id: Option<String>| *sink.lock().unwrap() = Some(id));

    let nodes = SectionRenderer::default().render(
        &[
            SectionEntry::new("categories", "Categories", 0),
            SectionEntry::new("featured", "Featured", 1),
        ],
        &ctx,
    );

    let pill = nodes[0]
        .find_all(&|n| n.text_content() == "Sides" && n.action().is_some())[0]
        .action()
        .unwrap()
        .clone();
    assert!(ctx.dispatch(&pill));
    assert_eq!(*selected.lock().unwrap(), Some(Some("sides".to_string())));

    let add = nodes[1].find_all(&|n| n.action().is_some())[0]
        .action()
        .unwrap()
        .clone();
    assert!(ctx.dispatch(&add));
    assert_eq!(*added.lock().unwrap(), vec![items[0].id.clone()]);

    assert!(!ctx.dispatch(&Action::AddToCart {
        item_id: "missing".into()
    }));
}

#[test]
fn html_output_is_escaped() {
    let node = Node::element("p")
        .attr("title", "a \"quote\"")
        .child(Node::text("<script>alert('x')</script>"));
    assert_eq!(
        node.to_html(),
        "<p title=\"a &quot;quote&quot;\">&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</p>"
    );
}

#[test]
fn cart_counts_units_and_totals() {
    let items = menu();
    let mut cart = Cart::default();
    cart.add(&items[0]);
    cart.add(&items[0]);
    cart.add(&items[1]);

    assert_eq!(cart.count(), 3);
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.total_cents(), 1000 * 2 + 1001);
    assert!(cart_node(&cart).text_content().contains("Total: 30.01"));
    assert!(header_node(&vendor(), cart.count())
        .text_content()
        .contains("Cart (3)"));
}
