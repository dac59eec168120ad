use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KvError>;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Record for key '{key}' is corrupted: {reason}")]
    Corrupted { key: String, reason: String },
    #[error("Invalid key '{0}'")]
    InvalidKey(String),
    #[error("Store lock poisoned")]
    Poisoned,
}

impl KvError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KvError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Key layout. Every tenant-owned record is prefixed with its owner so a
/// prefix scan is the isolation boundary.
pub mod keys {
    pub const VENDOR_PREFIX: &str = "vendor:";
    pub const SLUG_PREFIX: &str = "vendor-slug:";

    pub fn vendor(id: &str) -> String {
        format!("{VENDOR_PREFIX}{id}")
    }

    pub fn vendor_slug(slug: &str) -> String {
        format!("{SLUG_PREFIX}{slug}")
    }

    pub fn menu(vendor_id: &str) -> String {
        format!("menu:{vendor_id}")
    }

    pub fn categories(vendor_id: &str) -> String {
        format!("categories:{vendor_id}")
    }
}
