//! Per-vendor, per-template section lists: load with fallback, and the
//! dashboard mutations (toggle, reorder, content edit, add, reset).

use crate::sections::{
    default_sections, validate_sections, ConfigShape, SectionDescriptor, SectionEntry, SectionKind,
};
use crate::vendor::{Vendor, VendorError, VendorRepository};
use serde_json::{json, Map, Value};
use tracing::{debug, instrument, warn};

pub type Result<T> = std::result::Result<T, VendorError>;

/// Outcome of a mutation. `saved` is false for no-ops, in which case
/// `vendor` is the snapshot that was passed in.
#[derive(Debug, Clone)]
pub struct SectionUpdate {
    pub vendor: Vendor,
    pub saved: bool,
}

impl SectionUpdate {
    fn saved(vendor: Vendor) -> Self {
        Self {
            vendor,
            saved: true,
        }
    }

    fn unchanged(vendor: &Vendor) -> Self {
        Self {
            vendor: vendor.clone(),
            saved: false,
        }
    }
}

/// Reads and rewrites `storefront.templateConfigs` (and `storefront.template`)
/// on vendor records. No other vendor field is ever written from here.
#[derive(Clone)]
pub struct SectionStore {
    vendors: VendorRepository,
}

impl SectionStore {
    pub fn new(vendors: VendorRepository) -> Self {
        Self { vendors }
    }

    /// The template's section list, or a fresh copy of the registry defaults
    /// when nothing usable is stored. Never fails.
    pub fn load(&self, vendor: &Vendor, template: &str) -> Vec<SectionEntry> {
        match validate_sections(vendor.template_config(template)) {
            ConfigShape::Valid(sections) => sections,
            ConfigShape::Invalid(reason) => {
                warn!(
                    vendor_id = %vendor.id,
                    template,
                    %reason,
                    "using default sections"
                );
                default_sections()
            }
        }
    }

    /// `load`, renumbered so that `order` runs 0..N-1 in display order.
    /// Stored lists may carry gaps or ties; every mutation starts from here.
    fn load_for_edit(&self, vendor: &Vendor, template: &str) -> Vec<SectionEntry> {
        let mut sections = self.load(vendor, template);
        renumber(&mut sections);
        sections
    }

    /// Writes `sections` into `templateConfigs[template]` and returns the
    /// vendor as persisted. Other templates' lists and sibling storefront
    /// fields are left as they are in the store.
    #[instrument(
        skip(self, vendor, sections),
        fields(vendor_id = %vendor.id, count = sections.len())
    )]
    pub fn save(
        &self,
        vendor: &Vendor,
        template: &str,
        sections: &[SectionEntry],
    ) -> Result<Vendor> {
        // Serialized from the typed list only; nothing else can end up in the
        // persisted slot.
        let list = serde_json::to_value(sections)?;
        let mut configs = Map::new();
        configs.insert(template.to_string(), list);

        let patch = json!({ "storefront": { "templateConfigs": Value::Object(configs) } });
        let updated = self
            .vendors
            .update_vendor(&vendor.id, &patch)?
            .ok_or_else(|| VendorError::NotFound(vendor.id.clone()))?;

        debug!(template, "sections saved");
        Ok(updated)
    }

    /// Sets `enabled` on the entry with `section_id`. Unknown ids are a no-op.
    pub fn toggle(
        &self,
        vendor: &Vendor,
        template: &str,
        section_id: &str,
        enabled: bool,
    ) -> Result<SectionUpdate> {
        let mut sections = self.load_for_edit(vendor, template);
        let Some(entry) = sections.iter_mut().find(|s| s.id == section_id) else {
            debug!(section_id, "toggle of unknown section ignored");
            return Ok(SectionUpdate::unchanged(vendor));
        };
        entry.enabled = enabled;

        self.save(vendor, template, &sections).map(SectionUpdate::saved)
    }

    /// Moves the entry at `from` to `to` (remove then insert) and renumbers
    /// every `order` to its new position. Equal or out-of-range indices are a
    /// no-op.
    pub fn reorder(
        &self,
        vendor: &Vendor,
        template: &str,
        from: usize,
        to: usize,
    ) -> Result<SectionUpdate> {
        let mut sections = self.load_for_edit(vendor, template);
        if !move_entry(&mut sections, from, to) {
            debug!(from, to, "reorder ignored");
            return Ok(SectionUpdate::unchanged(vendor));
        }

        self.save(vendor, template, &sections).map(SectionUpdate::saved)
    }

    /// Merges `content` keys into the entry's copy. Unknown ids are a no-op.
    pub fn update_content(
        &self,
        vendor: &Vendor,
        template: &str,
        section_id: &str,
        content: Map<String, Value>,
    ) -> Result<SectionUpdate> {
        let mut sections = self.load_for_edit(vendor, template);
        let Some(entry) = sections.iter_mut().find(|s| s.id == section_id) else {
            return Ok(SectionUpdate::unchanged(vendor));
        };
        for (key, value) in content {
            if value.is_null() {
                entry.content.remove(&key);
            } else {
                entry.content.insert(key, value);
            }
        }

        self.save(vendor, template, &sections).map(SectionUpdate::saved)
    }

    /// Appends a registry kind at the end of the list. A kind already present
    /// is a no-op.
    pub fn add_section(
        &self,
        vendor: &Vendor,
        template: &str,
        kind: SectionKind,
    ) -> Result<SectionUpdate> {
        let mut sections = self.load_for_edit(vendor, template);
        if sections.iter().any(|s| s.id == kind.id()) {
            return Ok(SectionUpdate::unchanged(vendor));
        }
        sections.push(SectionDescriptor::for_kind(kind).to_entry(sections.len() as u32));
        renumber(&mut sections);

        self.save(vendor, template, &sections).map(SectionUpdate::saved)
    }

    /// Replaces the template's list with the registry defaults.
    pub fn reset(&self, vendor: &Vendor, template: &str) -> Result<Vendor> {
        self.save(vendor, template, &default_sections())
    }

    /// Persists `template` as the vendor's active template.
    pub fn set_active_template(&self, vendor: &Vendor, template: &str) -> Result<Vendor> {
        let patch = json!({ "storefront": { "template": template.trim() } });
        self.vendors
            .update_vendor(&vendor.id, &patch)?
            .ok_or_else(|| VendorError::NotFound(vendor.id.clone()))
    }
}

/// Array move, not swap. Returns false when nothing moved.
pub(crate) fn move_entry(sections: &mut Vec<SectionEntry>, from: usize, to: usize) -> bool {
    if from == to || from >= sections.len() || to >= sections.len() {
        return false;
    }
    let entry = sections.remove(from);
    sections.insert(to, entry);
    renumber(sections);
    true
}

fn renumber(sections: &mut [SectionEntry]) {
    for (i, entry) in sections.iter_mut().enumerate() {
        entry.order = i as u32;
    }
}
