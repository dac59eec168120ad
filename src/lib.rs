//! Storefront builder core: per-vendor section layouts, template resolution,
//! rendering, and change signalling between open tabs.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod kv;
pub mod logging;
pub mod render;
pub mod sections;
pub mod sync;
pub mod vendor;

pub use config::AppConfig;
pub use engine::{Dashboard, Services, StorefrontPage};
pub use error::{Result, StorefrontError};

#[cfg(feature = "desktop")]
pub fn run() -> anyhow::Result<()> {
    use crate::commands::{desktop::*, AppState};
    use crate::sync::VENDOR_UPDATED_KEY;
    use tauri::Emitter;
    use tokio::sync::broadcast::error::RecvError;

    let config = AppConfig::load()?;
    logging::init(&config.log_filter);
    let services = Services::from_config(&config)?;
    let hub = services.hub.clone();

    tauri::Builder::default()
        .manage(AppState::new(services))
        .setup(move |app| {
            // Every window is a tab; forward each change so pages re-fetch.
            let handle = app.handle().clone();
            let mut events = hub.subscribe();
            tauri::async_runtime::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) if event.key != VENDOR_UPDATED_KEY => continue,
                        Ok(_) | Err(RecvError::Lagged(_)) => {
                            if let Err(err) = handle.emit(VENDOR_UPDATED_KEY, ()) {
                                tracing::warn!(%err, "could not forward vendor update");
                            }
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            register_vendor,
            list_sections,
            toggle_section,
            reorder_sections,
            preview_template,
            publish_template,
            update_section_content,
            add_section,
            reset_sections,
            storefront_html
        ])
        .run(tauri::generate_context!())?;
    Ok(())
}
