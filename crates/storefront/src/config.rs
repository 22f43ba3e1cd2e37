//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `DESSERT_CATALOG_PATH` - Catalog JSON file (default: bundled catalog)
//! - `DESSERT_DATA_DIR` - Directory for persisted cart/favorites (default: .dessert-storefront)
//! - `DESSERT_CART_KEY` - Storage key for the cart (default: dessert-cart)
//! - `DESSERT_FAVORITES_KEY` - Storage key for favorites (default: dessert-favorites)
//! - `DESSERT_SEARCH_DEBOUNCE_MS` - Search quiet window in milliseconds (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate, 0.0 to 1.0 (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::persistence::{CART_KEY, FAVORITES_KEY};

const DEFAULT_DATA_DIR: &str = ".dessert-storefront";
const DEFAULT_SEARCH_DEBOUNCE_MS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storage keys for the two persisted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub cart: String,
    pub favorites: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            cart: CART_KEY.to_string(),
            favorites: FAVORITES_KEY.to_string(),
        }
    }
}

/// Sentry error tracking configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SentryConfig {
    pub dsn: String,
    pub environment: Option<String>,
    pub sample_rate: f32,
}

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    /// Catalog JSON file; `None` uses the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Directory holding persisted values
    pub data_dir: PathBuf,
    /// Keys for the persisted cart and favorites
    pub storage_keys: StorageKeys,
    /// Quiet window before search input reaches the filter
    pub search_debounce: Duration,
    /// Sentry configuration, present only when a DSN is set
    pub sentry: Option<SentryConfig>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_keys: StorageKeys::default(),
            search_debounce: crate::debounce::DEFAULT_SEARCH_DEBOUNCE,
            sentry: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let catalog_path = env.optional("DESSERT_CATALOG_PATH").map(PathBuf::from);
        let data_dir = PathBuf::from(env.or_default("DESSERT_DATA_DIR", DEFAULT_DATA_DIR));
        let storage_keys = StorageKeys {
            cart: env.or_default("DESSERT_CART_KEY", CART_KEY),
            favorites: env.or_default("DESSERT_FAVORITES_KEY", FAVORITES_KEY),
        };
        let debounce_ms = env
            .or_default("DESSERT_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("DESSERT_SEARCH_DEBOUNCE_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            catalog_path,
            data_dir,
            storage_keys,
            search_debounce: Duration::from_millis(debounce_ms),
            sentry: SentryConfig::from_env(&env)?,
        })
    }
}

impl SentryConfig {
    fn from_env(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(dsn) = env.optional("SENTRY_DSN") else {
            return Ok(None);
        };

        let sample_rate = env
            .or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar("SENTRY_SAMPLE_RATE".to_string(), e.to_string()))?;
        if !(0.0..=1.0).contains(&sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                format!("must be between 0.0 and 1.0 (got {sample_rate})"),
            ));
        }

        Ok(Some(Self {
            dsn,
            environment: env.optional("SENTRY_ENVIRONMENT"),
            sample_rate,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the default-handling helpers.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}
