//! Crate-level error, wrapping each layer's own error type.

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::kv::KvError;
use crate::vendor::VendorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Storage(#[from] KvError),
    #[error(transparent)]
    Vendor(#[from] VendorError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid public URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
