//! Page chrome built outside the section list: the header bar and the cart.

use crate::catalog::MenuItem;
use crate::render::Node;
use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub price_cents: u32,
    pub quantity: u32,
}

/// In-memory cart for one storefront tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn add(&mut self, item: &MenuItem) {
        match self.lines.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                item_id: item.id.clone(),
                name: item.name.clone(),
                price_cents: item.price_cents,
                quantity: 1,
            }),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of units.
    pub fn count(&self) -> usize {
        self.lines.iter().map(|line| line.quantity as usize).sum()
    }

    pub fn total_cents(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| line.price_cents as u64 * line.quantity as u64)
            .sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

pub fn header_node(vendor: &Vendor, cart_count: usize) -> Node {
    let mut header = Node::element("div")
        .class("store-header")
        .child(Node::text_element("span", vendor.name.clone()).class("store-name"));

    if let Some(logo) = vendor.storefront_field("logo").and_then(|v| v.as_str()) {
        header = header.child(
            Node::element("img")
                .attr("src", logo)
                .attr("alt", vendor.name.clone()),
        );
    }

    header.child(Node::text_element("span", format!("Cart ({cart_count})")).class("cart-badge"))
}

pub fn cart_node(cart: &Cart) -> Node {
    if cart.lines().is_empty() {
        return Node::element("aside")
            .class("cart")
            .child(Node::text_element("p", "Your cart is empty"));
    }

    let lines = cart.lines().iter().map(|line| {
        Node::text_element("li", format!("{} × {}", line.quantity, line.name))
            .attr("data-item", line.item_id.clone())
    });
    let total = cart.total_cents();

    Node::element("aside")
        .class("cart")
        .child(Node::element("ul").children(lines))
        .child(Node::text_element(
            "p",
            format!("Total: {}.{:02}", total / 100, total % 100),
        ))
}
