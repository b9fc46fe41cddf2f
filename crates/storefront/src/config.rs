//! Environment-driven configuration.

use std::path::PathBuf;

use anyhow::Context;
use thiserror::Error;

use storefront_catalog::Catalog;
use storefront_observability::{LogFormat, ParseLogFormatError};

pub const CATALOG_ENV: &str = "STOREFRONT_CATALOG";
pub const LOG_FORMAT_ENV: &str = "STOREFRONT_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("STOREFRONT_LOG_FORMAT: {0}")]
    LogFormat(#[from] ParseLogFormatError),
    #[error("STOREFRONT_CATALOG is set but empty")]
    EmptyCatalogPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StorefrontConfig {
    /// JSON catalog to load; `None` uses the bundled grocery catalog.
    pub catalog_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog_path = match lookup(CATALOG_ENV) {
            Some(path) if path.trim().is_empty() => return Err(ConfigError::EmptyCatalogPath),
            Some(path) => Some(PathBuf::from(path)),
            None => None,
        };

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            catalog_path,
            log_format,
        })
    }

    /// Load the configured catalog.
    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        let Some(path) = &self.catalog_path else {
            tracing::info!("STOREFRONT_CATALOG not set; using the bundled grocery catalog");
            return Ok(Catalog::grocery()?);
        };

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let catalog = Catalog::from_json(&json)
            .with_context(|| format!("loading catalog {}", path.display()))?;
        tracing::info!(path = %path.display(), products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}
