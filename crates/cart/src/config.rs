//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `INVENTORY_API_URL` - Inventory API base URL (default: `http://localhost:3333`)
//! - `CART_STORE_PATH` - File holding the persisted cart (default: `.rocketshoes/storage.json`)
//! - `INVENTORY_PRODUCT_CACHE_TTL_SECS` - Product details cache TTL, `0` disables (default: 300)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_INVENTORY_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORE_PATH: &str = ".rocketshoes/storage.json";
const DEFAULT_PRODUCT_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory API configuration
    pub inventory: InventoryConfig,
    /// File holding the persisted cart
    pub store_path: PathBuf,
}

/// Inventory API configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL of the inventory API
    pub base_url: Url,
    /// How long product details stay cached
    pub product_cache_ttl: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        let base_url = parse_base_url(
            "INVENTORY_API_URL",
            &get_or_default("INVENTORY_API_URL", DEFAULT_INVENTORY_API_URL),
        )?;

        let ttl_secs = get_or_default(
            "INVENTORY_PRODUCT_CACHE_TTL_SECS",
            DEFAULT_PRODUCT_CACHE_TTL_SECS,
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar(
                "INVENTORY_PRODUCT_CACHE_TTL_SECS".to_string(),
                e.to_string(),
            )
        })?;

        let store_path = get_or_default("CART_STORE_PATH", DEFAULT_STORE_PATH);
        if store_path.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORE_PATH".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            inventory: InventoryConfig {
                base_url,
                product_cache_ttl: Duration::from_secs(ttl_secs),
            },
            store_path: PathBuf::from(store_path),
        })
    }
}

/// Parse an HTTP(S) base URL.
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}
