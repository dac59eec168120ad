//! Static catalog of section kinds and their defaults.

use crate::sections::SectionEntry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Header,
    Hero,
    Featured,
    Categories,
    Promos,
    Menu,
    About,
    Services,
    HowItWorks,
    Reviews,
    Gallery,
    Cta,
    Newsletter,
    Faq,
    Team,
    Contact,
    Stats,
    Offers,
    Delivery,
    Payment,
    Partners,
    Footer,
}

impl SectionKind {
    /// Catalog order.
    pub const ALL: [SectionKind; 22] = [
        SectionKind::Header,
        SectionKind::Hero,
        SectionKind::Featured,
        SectionKind::Categories,
        SectionKind::Promos,
        SectionKind::Menu,
        SectionKind::About,
        SectionKind::Services,
        SectionKind::HowItWorks,
        SectionKind::Reviews,
        SectionKind::Gallery,
        SectionKind::Cta,
        SectionKind::Newsletter,
        SectionKind::Faq,
        SectionKind::Team,
        SectionKind::Contact,
        SectionKind::Stats,
        SectionKind::Offers,
        SectionKind::Delivery,
        SectionKind::Payment,
        SectionKind::Partners,
        SectionKind::Footer,
    ];

    /// Persisted identifier, e.g. `"howItWorks"`.
    pub fn id(self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Hero => "hero",
            SectionKind::Featured => "featured",
            SectionKind::Categories => "categories",
            SectionKind::Promos => "promos",
            SectionKind::Menu => "menu",
            SectionKind::About => "about",
            SectionKind::Services => "services",
            SectionKind::HowItWorks => "howItWorks",
            SectionKind::Reviews => "reviews",
            SectionKind::Gallery => "gallery",
            SectionKind::Cta => "cta",
            SectionKind::Newsletter => "newsletter",
            SectionKind::Faq => "faq",
            SectionKind::Team => "team",
            SectionKind::Contact => "contact",
            SectionKind::Stats => "stats",
            SectionKind::Offers => "offers",
            SectionKind::Delivery => "delivery",
            SectionKind::Payment => "payment",
            SectionKind::Partners => "partners",
            SectionKind::Footer => "footer",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SectionKind::Header => "Header",
            SectionKind::Hero => "Hero Banner",
            SectionKind::Featured => "Featured Items",
            SectionKind::Categories => "Categories",
            SectionKind::Promos => "Promotions",
            SectionKind::Menu => "Menu",
            SectionKind::About => "About Us",
            SectionKind::Services => "Services",
            SectionKind::HowItWorks => "How It Works",
            SectionKind::Reviews => "Customer Reviews",
            SectionKind::Gallery => "Gallery",
            SectionKind::Cta => "Call to Action",
            SectionKind::Newsletter => "Newsletter",
            SectionKind::Faq => "FAQ",
            SectionKind::Team => "Our Team",
            SectionKind::Contact => "Contact",
            SectionKind::Stats => "Stats",
            SectionKind::Offers => "Special Offers",
            SectionKind::Delivery => "Delivery Info",
            SectionKind::Payment => "Payment Methods",
            SectionKind::Partners => "Partners",
            SectionKind::Footer => "Footer",
        }
    }

    fn default_settings(self) -> Value {
        match self {
            SectionKind::Hero => json!({ "layout": "centered", "autoplay": false }),
            SectionKind::Featured => json!({ "columns": 3, "limit": 6 }),
            SectionKind::Categories => json!({ "layout": "pills" }),
            SectionKind::Menu => json!({ "columns": 2, "showImages": true }),
            SectionKind::Reviews => json!({ "autoplay": true, "limit": 3 }),
            SectionKind::Gallery => json!({ "columns": 4 }),
            SectionKind::Stats => json!({ "columns": 4 }),
            SectionKind::Team => json!({ "columns": 3 }),
            _ => json!({}),
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// The kinds a new storefront starts with, top to bottom.
pub const DEFAULT_LAYOUT: [SectionKind; 9] = [
    SectionKind::Header,
    SectionKind::Hero,
    SectionKind::Featured,
    SectionKind::Categories,
    SectionKind::Menu,
    SectionKind::About,
    SectionKind::Reviews,
    SectionKind::Contact,
    SectionKind::Footer,
];

/// Registry defaults for one section kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDescriptor {
    pub kind: SectionKind,
    pub name: &'static str,
    pub default_enabled: bool,
    pub default_order: u32,
    pub settings: Map<String, Value>,
    pub content: Map<String, Value>,
}

impl SectionDescriptor {
    pub fn for_kind(kind: SectionKind) -> Self {
        let default_order = SectionKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default() as u32;

        Self {
            kind,
            name: kind.display_name(),
            default_enabled: true,
            default_order,
            settings: as_map(kind.default_settings()),
            content: Map::new(),
        }
    }

    /// A fresh entry for this kind placed at `order`.
    pub fn to_entry(&self, order: u32) -> SectionEntry {
        SectionEntry {
            id: self.kind.id().to_string(),
            name: self.name.to_string(),
            enabled: self.default_enabled,
            order,
            settings: self.settings.clone(),
            content: self.content.clone(),
        }
    }
}

fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Every known section kind, in catalog order.
pub fn catalog() -> Vec<SectionDescriptor> {
    SectionKind::ALL
        .into_iter()
        .map(SectionDescriptor::for_kind)
        .collect()
}

/// Seed layout for a template with no usable stored configuration: every
/// entry enabled, `order` equal to its position.
pub fn default_sections() -> Vec<SectionEntry> {
    DEFAULT_LAYOUT
        .into_iter()
        .enumerate()
        .map(|(i, kind)| SectionDescriptor::for_kind(kind).to_entry(i as u32))
        .collect()
}
