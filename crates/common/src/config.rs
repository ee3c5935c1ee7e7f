//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Listing pagination configuration.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Index page cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Uploaded file storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Pagination configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Number of posts per listing page.
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

/// Index page cache configuration.
///
/// The cache is served without write-through invalidation: listings may be
/// stale for up to `ttl_secs` after a write.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Whether the index page cache is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cache entry lifetime in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// Uploaded file storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Base directory for stored files.
    #[serde(default = "default_files_path")]
    pub path: String,
    /// Base URL under which stored files are served.
    #[serde(default = "default_files_url")]
    pub url: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            path: default_files_path(),
            url: default_files_url(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_per_page() -> u64 {
    10
}

const fn default_cache_ttl() -> u64 {
    20
}

fn default_files_path() -> String {
    "./files".to_string()
}

fn default_files_url() -> String {
    "/files".to_string()
}

const fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `GAZETTE_ENV`)
    /// 3. Environment variables with `GAZETTE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("GAZETTE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GAZETTE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("GAZETTE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
