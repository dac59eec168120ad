//! Application layer: the shared service graph and the two kinds of tab
//! (vendor dashboard, public storefront) built on it.

pub mod dashboard;
pub mod storefront;

pub use dashboard::Dashboard;
pub use storefront::StorefrontPage;

use crate::catalog::CatalogRepository;
use crate::config::{AppConfig, StorageBackend};
use crate::error::Result;
use crate::kv::{FileStore, KvStore, MemoryStore};
use crate::render::SectionRenderer;
use crate::sections::{SectionStore, TemplateId, TemplateResolver};
use crate::sync::{SyncBus, SyncHub};
use crate::vendor::VendorRepository;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Everything a tab needs, built once at the application root and cloned
/// into each tab.
#[derive(Clone)]
pub struct Services {
    pub vendors: VendorRepository,
    pub catalog: CatalogRepository,
    pub sections: SectionStore,
    pub resolver: TemplateResolver,
    pub renderer: Arc<SectionRenderer>,
    pub hub: SyncHub,
    pub base_url: Url,
}

impl Services {
    pub fn new(
        kv: Arc<dyn KvStore>,
        fallback: TemplateId,
        sync_capacity: usize,
        base_url: Url,
    ) -> Self {
        let vendors = VendorRepository::new(kv.clone());
        let sections = SectionStore::new(vendors.clone());
        Self {
            catalog: CatalogRepository::new(kv),
            resolver: TemplateResolver::new(sections.clone(), fallback),
            sections,
            vendors,
            renderer: Arc::new(SectionRenderer::with_builtin_units()),
            hub: SyncHub::new(sync_capacity),
            base_url,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let kv: Arc<dyn KvStore> = match config.storage {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(FileStore::open(&config.data_dir)?),
        };
        info!(storage = ?config.storage, "storefront services ready");
        Ok(Self::new(
            kv,
            TemplateId::new(config.fallback_template.clone()),
            config.sync_capacity,
            config.base_url()?,
        ))
    }

    /// In-memory services with the default configuration.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            TemplateId::modern(),
            AppConfig::default().sync_capacity,
            Url::parse("http://localhost:1420").expect("static URL is valid"),
        )
    }

    /// Opens a new tab on the shared hub.
    pub fn open_tab(&self) -> SyncBus {
        SyncBus::connect(&self.hub)
    }
}

#[cfg(test)]
mod tests;
