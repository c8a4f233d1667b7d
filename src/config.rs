//! Configuration stored in `~/.rehabos/config.json`.
//!
//! `REHABOS_STORE_URL` / `REHABOS_ANON_KEY` environment variables override
//! the file, so the binary can run against a scratch store without
//! touching the user's config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Remote store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Base URL of the store, e.g. `https://abc.example.co`.
    pub store_url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
}

/// Path to the config file: `~/.rehabos/config.json`.
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rehabos")
        .join("config.json")
}

/// Load config, preferring environment overrides over the file.
pub fn load_config() -> Result<StoreConfig, CoreError> {
    if let (Ok(store_url), Ok(anon_key)) = (
        std::env::var("REHABOS_STORE_URL"),
        std::env::var("REHABOS_ANON_KEY"),
    ) {
        return Ok(StoreConfig {
            store_url,
            anon_key,
        });
    }
    load_config_from(&config_path())
}

pub fn load_config_from(path: &std::path::Path) -> Result<StoreConfig, CoreError> {
    let content = std::fs::read_to_string(path)?;
    let config: StoreConfig = serde_json::from_str(&content)?;
    Ok(config)
}
