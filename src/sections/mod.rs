//! Section configuration pipeline: the registry of section kinds, the
//! per-template section lists stored on each vendor, and template resolution.
//!
//! ```text
//! registry (defaults) → validate (stored JSON) → store (toggle/reorder/save)
//!                                             ↘ resolver (active template)
//! ```

pub mod entry;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod validate;

pub use entry::SectionEntry;
pub use registry::{catalog, default_sections, SectionDescriptor, SectionKind, DEFAULT_LAYOUT};
pub use resolver::{ActiveConfig, TemplateId, TemplateResolver};
pub use store::{SectionStore, SectionUpdate};
pub use validate::{validate_sections, ConfigShape, InvalidReason};
