//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Page size for the filtered product listing
    pub product_per_page: usize,
    /// Number of products returned by the latest-products listing
    pub latest_products_limit: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 4000)
    /// - `CLEANUP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 60)
    /// - `PRODUCT_PER_PAGE` - Filtered listing page size (default: 8)
    /// - `LATEST_PRODUCTS_LIMIT` - Latest-products listing size (default: 8)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            product_per_page: env::var("PRODUCT_PER_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            latest_products_limit: env::var("LATEST_PRODUCTS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 4000,
            cleanup_interval: 60,
            product_per_page: 8,
            latest_products_limit: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.product_per_page, 8);
        assert_eq!(config.latest_products_limit, 8);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("PRODUCT_PER_PAGE");
        env::remove_var("LATEST_PRODUCTS_LIMIT");

        let config = Config::from_env();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.product_per_page, 8);
        assert_eq!(config.latest_products_limit, 8);
    }
}
