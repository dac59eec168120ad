//! Storefront rendering: turns an ordered section list into a view tree.

pub mod chrome;
pub mod content;
pub mod context;
pub mod node;
pub mod renderer;
pub mod units;

pub use chrome::{cart_node, header_node, Cart, CartLine};
pub use context::{Callback, RenderContext};
pub use node::{to_html, Action, Node};
pub use renderer::{unit, RenderFn, SectionRenderer};

#[cfg(test)]
mod tests;
