//! Synchronous key-value persistence, the storefront's only backing store.
//!
//! Everything the builder persists (vendors, catalog, section layouts) lives
//! in one flat, string-keyed space. Tenancy is expressed purely through key
//! prefixes, see [`keys`].

pub mod storage;
pub mod types;

pub use storage::{FileStore, KvStore, MemoryStore};
pub use types::*;
