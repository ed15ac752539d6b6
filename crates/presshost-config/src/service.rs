use std::path::PathBuf;

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

/// Default root under which each site gets a working directory
pub const DEFAULT_SITES_ROOT: &str = "/var/www";
/// Default nginx configuration root (holds sites-available / sites-enabled)
pub const DEFAULT_NGINX_CONFIG_DIR: &str = "/etc/nginx";
/// Default PHP-FPM socket passed into generated vhosts
pub const DEFAULT_PHP_FPM_SOCKET: &str = "unix:/var/run/php/php8.1-fpm.sock";
/// Default ClassicPress release archive
pub const DEFAULT_ARCHIVE_URL: &str = "https://www.classicpress.net/latest.zip";
/// Default per-user concurrent site limit
pub const DEFAULT_MAX_SITES_PER_USER: u64 = 5;
/// Default job channel capacity
pub const DEFAULT_QUEUE_BUFFER: usize = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {details}")]
    InvalidConfiguration { details: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    // Required fields
    pub address: String,
    pub database_url: String,

    // Provisioning targets
    pub sites_root: PathBuf,
    pub nginx_config_dir: PathBuf,
    pub php_fpm_socket: String,
    pub archive_url: String,

    // Limits
    pub max_sites_per_user: u64,
    pub queue_buffer: usize,
}

impl ServerConfig {
    /// Create a new configuration with minimal parameters.
    /// Provisioning paths and limits come from the environment, falling
    /// back to the stock Debian/nginx layout.
    pub fn new(address: String, database_url: String) -> Result<Self, ConfigError> {
        if address.is_empty() {
            return Err(ConfigError::InvalidConfiguration {
                details: "Bind address cannot be empty".to_string(),
            });
        }
        if database_url.is_empty() {
            return Err(ConfigError::InvalidConfiguration {
                details: "Database URL cannot be empty".to_string(),
            });
        }

        Ok(ServerConfig {
            address,
            database_url,
            sites_root: std::env::var("PRESSHOST_SITES_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SITES_ROOT)),
            nginx_config_dir: std::env::var("PRESSHOST_NGINX_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_NGINX_CONFIG_DIR)),
            php_fpm_socket: std::env::var("PRESSHOST_PHP_FPM_SOCKET")
                .unwrap_or_else(|_| DEFAULT_PHP_FPM_SOCKET.to_string()),
            archive_url: std::env::var("PRESSHOST_ARCHIVE_URL")
                .unwrap_or_else(|_| DEFAULT_ARCHIVE_URL.to_string()),
            max_sites_per_user: std::env::var("PRESSHOST_MAX_SITES_PER_USER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_SITES_PER_USER),
            queue_buffer: std::env::var("PRESSHOST_QUEUE_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_QUEUE_BUFFER),
        })
    }
}
