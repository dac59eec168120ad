//! Menu items and categories, stored per vendor.

use crate::kv::{keys, KvError, KvStore};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Storage error: {0}")]
    Storage(#[from] KvError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u32,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "available_by_default")]
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
}

fn available_by_default() -> bool {
    true
}

impl MenuItem {
    pub fn new(vendor_id: &str, name: impl Into<String>, price_cents: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id: vendor_id.to_string(),
            name: name.into(),
            description: String::new(),
            price_cents,
            category_id: None,
            image: None,
            available: true,
            featured: false,
        }
    }

    pub fn in_category(mut self, category_id: &str) -> Self {
        self.category_id = Some(category_id.to_string());
        self
    }

    /// Price as `12.50`.
    pub fn display_price(&self) -> String {
        format!("{}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub vendor_id: String,
    pub name: String,
    #[serde(default)]
    pub order: u32,
}

impl Category {
    pub fn new(vendor_id: &str, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vendor_id: vendor_id.to_string(),
            name: name.into(),
            order,
        }
    }
}

/// Per-vendor catalog lists. Each vendor's items live under their own key,
/// so one tenant can never read another's menu.
#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn KvStore>,
}

impl CatalogRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn menu_items(&self, vendor_id: &str) -> Result<Vec<MenuItem>> {
        self.read_list(&keys::menu(vendor_id))
    }

    /// Categories in display order.
    pub fn categories(&self, vendor_id: &str) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self.read_list(&keys::categories(vendor_id))?;
        categories.sort_by_key(|c| c.order);
        Ok(categories)
    }

    pub fn add_menu_item(&self, item: MenuItem) -> Result<MenuItem> {
        let key = keys::menu(&item.vendor_id);
        let mut items: Vec<MenuItem> = self.read_list(&key)?;
        items.push(item.clone());
        self.store.set(&key, &serde_json::to_string(&items)?)?;
        Ok(item)
    }

    pub fn add_category(&self, category: Category) -> Result<Category> {
        let key = keys::categories(&category.vendor_id);
        let mut categories: Vec<Category> = self.read_list(&key)?;
        categories.push(category.clone());
        self.store.set(&key, &serde_json::to_string(&categories)?)?;
        Ok(category)
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests;
