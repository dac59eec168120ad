//! Vendor dashboard tab: edits the section layout of one template and tells
//! every other tab about each saved change.

use crate::engine::Services;
use crate::error::Result;
use crate::sections::{SectionEntry, SectionKind, SectionUpdate, TemplateId};
use crate::sync::SyncBus;
use crate::vendor::{storefront_url, Vendor, VendorError};
use serde_json::{Map, Value};
use tracing::{info, instrument};
use url::Url;

pub struct Dashboard {
    services: Services,
    bus: SyncBus,
    vendor: Vendor,
    preview: Option<TemplateId>,
}

impl Dashboard {
    /// Opens the dashboard for `vendor_id` on its own tab.
    pub fn open(services: Services, vendor_id: &str) -> Result<Self> {
        let bus = services.open_tab();
        Self::open_on(services, bus, vendor_id)
    }

    /// Opens the dashboard on an existing tab, e.g. one that also shows the
    /// storefront.
    pub fn open_on(services: Services, bus: SyncBus, vendor_id: &str) -> Result<Self> {
        let vendor = services
            .vendors
            .get_vendor(vendor_id)?
            .ok_or_else(|| VendorError::NotFound(vendor_id.to_string()))?;
        Ok(Self {
            services,
            bus,
            vendor,
            preview: None,
        })
    }

    pub fn vendor(&self) -> &Vendor {
        &self.vendor
    }

    pub fn bus(&self) -> &SyncBus {
        &self.bus
    }

    /// Template being edited: the preview if one is set, else the active one.
    pub fn template(&self) -> TemplateId {
        self.services
            .resolver
            .active_template(&self.vendor, self.preview.as_ref().map(TemplateId::as_str))
    }

    pub fn preview(&self) -> Option<&TemplateId> {
        self.preview.as_ref()
    }

    /// Section list as the editor shows it.
    pub fn sections(&self) -> Vec<SectionEntry> {
        self.services
            .sections
            .load(&self.vendor, self.template().as_str())
    }

    pub fn storefront_url(&self) -> Result<Url> {
        Ok(storefront_url(&self.services.base_url, &self.vendor.slug)?)
    }

    /// Switches which template is edited without changing what the public
    /// storefront shows. `None` returns to the active template.
    pub fn preview_template(&mut self, template: Option<&str>) {
        self.preview = template
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(TemplateId::new);
    }

    #[instrument(skip(self), fields(vendor_id = %self.vendor.id))]
    pub fn toggle_section(&mut self, section_id: &str, enabled: bool) -> Result<bool> {
        let update = self.services.sections.toggle(
            &self.vendor,
            self.template().as_str(),
            section_id,
            enabled,
        )?;
        Ok(self.apply(update))
    }

    /// Drag-and-drop: moves the section at `from` to `to`.
    #[instrument(skip(self), fields(vendor_id = %self.vendor.id))]
    pub fn move_section(&mut self, from: usize, to: usize) -> Result<bool> {
        let update = self
            .services
            .sections
            .reorder(&self.vendor, self.template().as_str(), from, to)?;
        Ok(self.apply(update))
    }

    pub fn update_content(
        &mut self,
        section_id: &str,
        content: Map<String, Value>,
    ) -> Result<bool> {
        let update = self.services.sections.update_content(
            &self.vendor,
            self.template().as_str(),
            section_id,
            content,
        )?;
        Ok(self.apply(update))
    }

    pub fn add_section(&mut self, kind: SectionKind) -> Result<bool> {
        let update = self
            .services
            .sections
            .add_section(&self.vendor, self.template().as_str(), kind)?;
        Ok(self.apply(update))
    }

    pub fn reset_sections(&mut self) -> Result<()> {
        let vendor = self
            .services
            .sections
            .reset(&self.vendor, self.template().as_str())?;
        self.saved(vendor);
        Ok(())
    }

    /// Makes the edited template the one the public storefront shows.
    pub fn publish_template(&mut self) -> Result<()> {
        let template = self.template();
        let vendor = self
            .services
            .sections
            .set_active_template(&self.vendor, template.as_str())?;
        info!(vendor_id = %vendor.id, %template, "template published");
        self.preview = None;
        self.saved(vendor);
        Ok(())
    }

    /// Re-reads the vendor, picking up writes made by other tabs.
    pub fn refresh(&mut self) -> Result<()> {
        self.vendor = self
            .services
            .vendors
            .get_vendor(&self.vendor.id)?
            .ok_or_else(|| VendorError::NotFound(self.vendor.id.clone()))?;
        Ok(())
    }

    fn apply(&mut self, update: SectionUpdate) -> bool {
        if update.saved {
            self.saved(update.vendor);
        }
        update.saved
    }

    fn saved(&mut self, vendor: Vendor) {
        self.vendor = vendor;
        self.bus.notify_vendor_updated();
    }
}
