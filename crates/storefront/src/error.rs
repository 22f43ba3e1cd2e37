//! Unified error handling.
//!
//! Cart, favorites and filter intents never fail; persistence problems are
//! reported to an observer instead. What remains are startup errors (bad
//! configuration, unreadable catalog) and context misuse, all collected in
//! [`StorefrontError`].

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Misuse of the application root: a programming error, not a data
/// condition. Surfaced immediately to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The storefront was built without a required collaborator.
    #[error("storefront used before {0} was provided")]
    Missing(&'static str),

    /// The owning task has stopped; the handle can no longer reach it.
    #[error("storefront task is no longer running")]
    Closed,
}

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Context misuse.
    #[error("Context error: {0}")]
    Context(#[from] ContextError),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::from(ContextError::Missing("a catalog"));
        assert_eq!(
            err.to_string(),
            "Context error: storefront used before a catalog was provided"
        );

        let err = StorefrontError::from(ConfigError::InvalidEnvVar(
            "DESSERT_SEARCH_DEBOUNCE_MS".to_string(),
            "invalid digit found in string".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Config error: Invalid environment variable DESSERT_SEARCH_DEBOUNCE_MS: invalid digit found in string"
        );
    }

    #[test]
    fn test_closed_display() {
        assert_eq!(
            ContextError::Closed.to_string(),
            "storefront task is no longer running"
        );
    }
}
