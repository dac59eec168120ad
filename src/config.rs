//! Application configuration: defaults, then an optional TOML file, then
//! `STOREFRONT_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;
use url::Url;

pub const CONFIG_PATH_VAR: &str = "STOREFRONT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing survives a restart.
    Memory,
    /// One checksummed file per key under `data_dir`.
    File,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    /// Template used when a vendor has none stored and no preview is active.
    pub fallback_template: String,
    /// Base for public storefront links, `{base}/store/{slug}`.
    pub public_base_url: String,
    /// Events a slow tab may fall behind before individual signals coalesce.
    pub sync_capacity: usize,
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("storefront-data"),
            storage: StorageBackend::Memory,
            fallback_template: "modern".to_string(),
            public_base_url: "http://localhost:1420".to_string(),
            sync_capacity: 64,
            log_filter: "storefront_lib=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads `.env`, the file named by `STOREFRONT_CONFIG` (if set), then the
    /// process environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies `STOREFRONT_*` overrides looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var("STOREFRONT_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = var("STOREFRONT_STORAGE") {
            self.storage = match value.to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "file" => StorageBackend::File,
                _ => {
                    return Err(ConfigError::InvalidVar {
                        var: "STOREFRONT_STORAGE",
                        value,
                    })
                }
            };
        }
        if let Some(template) = var("STOREFRONT_FALLBACK_TEMPLATE") {
            self.fallback_template = template;
        }
        if let Some(url) = var("STOREFRONT_PUBLIC_BASE_URL") {
            self.public_base_url = url;
        }
        if let Some(value) = var("STOREFRONT_SYNC_CAPACITY") {
            self.sync_capacity = value.parse().map_err(|_| ConfigError::InvalidVar {
                var: "STOREFRONT_SYNC_CAPACITY",
                value,
            })?;
        }
        if let Some(filter) = var("STOREFRONT_LOG") {
            self.log_filter = filter;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.fallback_template.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "fallback_template must not be empty".into(),
            ));
        }
        if self.sync_capacity == 0 {
            return Err(ConfigError::Invalid(
                "sync_capacity must be greater than zero".into(),
            ));
        }
        self.base_url()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.public_base_url).map_err(|e| {
            ConfigError::Invalid(format!("public_base_url '{}': {e}", self.public_base_url))
        })
    }
}
