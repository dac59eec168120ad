//! Picks the template a storefront renders with and loads its sections.

use crate::sections::{SectionEntry, SectionStore};
use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Template identifier as stored on the vendor.
///
/// Any string is accepted so that records referring to retired templates
/// still load; [`TemplateId::is_supported`] tells the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub const MODERN: &'static str = "modern";

    /// Ids found on older records; they still resolve but are no longer
    /// offered in the dashboard.
    pub const LEGACY: [&'static str; 4] = ["classic", "minimal", "elegant", "vibrant"];

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn modern() -> Self {
        Self::new(Self::MODERN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_supported(&self) -> bool {
        self.0 == Self::MODERN
    }

    pub fn is_legacy(&self) -> bool {
        Self::LEGACY.contains(&self.0.as_str())
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveConfig {
    pub template: TemplateId,
    pub sections: Vec<SectionEntry>,
}

#[derive(Clone)]
pub struct TemplateResolver {
    store: SectionStore,
    fallback: TemplateId,
}

impl TemplateResolver {
    pub fn new(store: SectionStore, fallback: TemplateId) -> Self {
        Self { store, fallback }
    }

    pub fn fallback(&self) -> &TemplateId {
        &self.fallback
    }

    /// Preview override if non-blank, else the vendor's stored template, else
    /// the fallback. Both ids are trimmed.
    pub fn active_template(&self, vendor: &Vendor, preview: Option<&str>) -> TemplateId {
        preview
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or_else(|| vendor.template())
            .map(TemplateId::new)
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Active template plus its sections. An unsupported template still
    /// returns whatever is stored (or defaulted) for it.
    pub fn resolve_active_config(&self, vendor: &Vendor, preview: Option<&str>) -> ActiveConfig {
        let template = self.active_template(vendor, preview);
        let sections = self.store.load(vendor, template.as_str());
        ActiveConfig { template, sections }
    }
}
