use crate::catalog::{Category, MenuItem};
use crate::render::{Action, Node};
use crate::vendor::Vendor;
use std::sync::Arc;

pub type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Shared inputs handed to every section unit. Units read what they need and
/// ignore the rest.
#[derive(Clone)]
pub struct RenderContext<'a> {
    pub vendor: &'a Vendor,
    pub menu_items: &'a [MenuItem],
    pub categories: &'a [Category],
    pub selected_category: Option<&'a str>,
    pub on_category_change: Callback<Option<String>>,
    pub on_add_to_cart: Callback<MenuItem>,
    pub cart_count: usize,
    pub cart_node: Node,
    pub header_node: Node,
}

impl<'a> RenderContext<'a> {
    /// Context with no-op callbacks and empty chrome.
    pub fn new(vendor: &'a Vendor, menu_items: &'a [MenuItem], categories: &'a [Category]) -> Self {
        Self {
            vendor,
            menu_items,
            categories,
            selected_category: None,
            on_category_change: Arc::new(|_| {}),
            on_add_to_cart: Arc::new(|_| {}),
            cart_count: 0,
            cart_node: Node::fragment(Vec::new()),
            header_node: Node::fragment(Vec::new()),
        }
    }

    /// Items visible under the current category selection.
    pub fn visible_items(&self) -> impl Iterator<Item = &'a MenuItem> + '_ {
        self.menu_items.iter().filter(move |item| {
            item.available
                && match self.selected_category {
                    Some(selected) => item.category_id.as_deref() == Some(selected),
                    None => true,
                }
        })
    }

    /// Routes a node action to the matching callback. Returns false when the
    /// action refers to an item this context does not carry.
    pub fn dispatch(&self, action: &Action) -> bool {
        match action {
            Action::AddToCart { item_id } => {
                match self.menu_items.iter().find(|item| &item.id == item_id) {
                    Some(item) => {
                        (self.on_add_to_cart)(item.clone());
                        true
                    }
                    None => false,
                }
            }
            Action::SelectCategory { category_id } => {
                (self.on_category_change)(category_id.clone());
                true
            }
        }
    }
}
