//! Dashboard-facing commands. Every command returns the stringified error to
//! the UI boundary; the `desktop` feature exposes them as Tauri commands.

use crate::engine::{Dashboard, Services, StorefrontPage};
use crate::error::StorefrontError;
use crate::sections::{SectionEntry, SectionKind};
use crate::sync::SyncBus;
use crate::vendor::{NewVendor, Vendor};
use serde_json::{Map, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Shared by every window: the service graph plus one dashboard per vendor.
pub struct AppState {
    services: Services,
    bus: SyncBus,
    dashboards: Mutex<HashMap<String, Dashboard>>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            bus: services.open_tab(),
            services,
            dashboards: Mutex::new(HashMap::new()),
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Runs `edit` on the vendor's dashboard, opening it on first use. The
    /// vendor is re-read first so edits start from what other windows saved.
    fn with_dashboard<T>(
        &self,
        vendor_id: &str,
        edit: impl FnOnce(&mut Dashboard) -> Result<T, StorefrontError>,
    ) -> Result<T, String> {
        let mut dashboards = self
            .dashboards
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let dashboard = match dashboards.entry(vendor_id.to_string()) {
            Entry::Occupied(entry) => {
                let dashboard = entry.into_mut();
                dashboard.refresh().map_err(|e| e.to_string())?;
                dashboard
            }
            Entry::Vacant(entry) => entry.insert(
                Dashboard::open(self.services.clone(), vendor_id).map_err(|e| e.to_string())?,
            ),
        };
        edit(dashboard).map_err(|e| e.to_string())
    }
}

pub fn register_vendor(
    state: &AppState,
    slug: String,
    name: String,
    email: String,
) -> Result<Vendor, String> {
    state
        .services
        .vendors
        .register_vendor(NewVendor { slug, name, email })
        .map_err(|e| e.to_string())
}

pub fn list_sections(state: &AppState, vendor_id: String) -> Result<Vec<SectionEntry>, String> {
    state.with_dashboard(&vendor_id, |d| Ok(d.sections()))
}

pub fn toggle_section(
    state: &AppState,
    vendor_id: String,
    section_id: String,
    enabled: bool,
) -> Result<Vec<SectionEntry>, String> {
    state.with_dashboard(&vendor_id, |d| {
        d.toggle_section(&section_id, enabled)?;
        Ok(d.sections())
    })
}

pub fn reorder_sections(
    state: &AppState,
    vendor_id: String,
    from: usize,
    to: usize,
) -> Result<Vec<SectionEntry>, String> {
    state.with_dashboard(&vendor_id, |d| {
        d.move_section(from, to)?;
        Ok(d.sections())
    })
}

/// Switches the template being edited; `None` goes back to the active one.
pub fn preview_template(
    state: &AppState,
    vendor_id: String,
    template: Option<String>,
) -> Result<Vec<SectionEntry>, String> {
    state.with_dashboard(&vendor_id, |d| {
        d.preview_template(template.as_deref());
        Ok(d.sections())
    })
}

pub fn publish_template(state: &AppState, vendor_id: String) -> Result<String, String> {
    state.with_dashboard(&vendor_id, |d| {
        d.publish_template()?;
        Ok(d.template().to_string())
    })
}

pub fn update_section_content(
    state: &AppState,
    vendor_id: String,
    section_id: String,
    content: Map<String, Value>,
) -> Result<Vec<SectionEntry>, String> {
    state.with_dashboard(&vendor_id, |d| {
        d.update_content(&section_id, content)?;
        Ok(d.sections())
    })
}

pub fn add_section(
    state: &AppState,
    vendor_id: String,
    kind: String,
) -> Result<Vec<SectionEntry>, String> {
    let kind =
        SectionKind::from_id(&kind).ok_or_else(|| format!("Unknown section kind '{kind}'"))?;
    state.with_dashboard(&vendor_id, |d| {
        d.add_section(kind)?;
        Ok(d.sections())
    })
}

pub fn reset_sections(state: &AppState, vendor_id: String) -> Result<Vec<SectionEntry>, String> {
    state.with_dashboard(&vendor_id, |d| {
        d.reset_sections()?;
        Ok(d.sections())
    })
}

/// Renders `/store/{slug}` as HTML.
pub fn storefront_html(
    state: &AppState,
    slug: String,
    preview: Option<String>,
) -> Result<String, String> {
    let page = StorefrontPage::open(
        state.services.clone(),
        &state.bus,
        &slug,
        preview.as_deref(),
    )
    .map_err(|e| e.to_string())?;
    Ok(page.html())
}

#[cfg(feature = "desktop")]
pub mod desktop {
    //! Tauri wrappers; argument names are the camelCase keys the UI sends.

    use super::AppState;
    use crate::sections::SectionEntry;
    use crate::vendor::Vendor;
    use serde_json::{Map, Value};
    use tauri::{command, State};

    #[command]
    pub fn register_vendor(
        state: State<'_, AppState>,
        slug: String,
        name: String,
        email: String,
    ) -> Result<Vendor, String> {
        super::register_vendor(&state, slug, name, email)
    }

    #[command]
    pub fn list_sections(
        state: State<'_, AppState>,
        vendor_id: String,
    ) -> Result<Vec<SectionEntry>, String> {
        super::list_sections(&state, vendor_id)
    }

    #[command]
    pub fn toggle_section(
        state: State<'_, AppState>,
        vendor_id: String,
        section_id: String,
        enabled: bool,
    ) -> Result<Vec<SectionEntry>, String> {
        super::toggle_section(&state, vendor_id, section_id, enabled)
    }

    #[command]
    pub fn reorder_sections(
        state: State<'_, AppState>,
        vendor_id: String,
        from: usize,
        to: usize,
    ) -> Result<Vec<SectionEntry>, String> {
        super::reorder_sections(&state, vendor_id, from, to)
    }

    #[command]
    pub fn preview_template(
        state: State<'_, AppState>,
        vendor_id: String,
        template: Option<String>,
    ) -> Result<Vec<SectionEntry>, String> {
        super::preview_template(&state, vendor_id, template)
    }

    #[command]
    pub fn publish_template(
        state: State<'_, AppState>,
        vendor_id: String,
    ) -> Result<String, String> {
        super::publish_template(&state, vendor_id)
    }

    #[command]
    pub fn update_section_content(
        state: State<'_, AppState>,
        vendor_id: String,
        section_id: String,
        content: Map<String, Value>,
    ) -> Result<Vec<SectionEntry>, String> {
        super::update_section_content(&state, vendor_id, section_id, content)
    }

    #[command]
    pub fn add_section(
        state: State<'_, AppState>,
        vendor_id: String,
        kind: String,
    ) -> Result<Vec<SectionEntry>, String> {
        super::add_section(&state, vendor_id, kind)
    }

    #[command]
    pub fn reset_sections(
        state: State<'_, AppState>,
        vendor_id: String,
    ) -> Result<Vec<SectionEntry>, String> {
        super::reset_sections(&state, vendor_id)
    }

    #[command]
    pub fn storefront_html(
        state: State<'_, AppState>,
        slug: String,
        preview: Option<String>,
    ) -> Result<String, String> {
        super::storefront_html(&state, slug, preview)
    }
}
