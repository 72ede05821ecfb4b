//! Configuration Module
//!
//! Loads server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::credentials::HashParams;

/// Server configuration parameters.
///
/// Every value can be set through an environment variable; unset or
/// unparsable variables fall back to the default.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cache entries
    pub max_entries: usize,
    /// Cache TTL in seconds for writes that do not name one
    pub default_ttl: u64,
    /// TTL in seconds of cached user projections
    pub user_cache_ttl: u64,
    /// TTL in seconds of cached single items
    pub item_cache_ttl: u64,
    /// TTL in seconds of the aggregate item list
    pub items_all_cache_ttl: u64,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Argon2 cost parameters
    pub hash_params: HashParams,
}

impl Config {
    /// Creates a new Config from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default cache TTL in seconds (default: 300)
    /// - `USER_CACHE_TTL` - User projection TTL in seconds (default: 3600)
    /// - `ITEM_CACHE_TTL` - Single item TTL in seconds (default: 600)
    /// - `ITEMS_ALL_CACHE_TTL` - Item list TTL in seconds (default: 60)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `HASH_MEMORY_KIB`, `HASH_ITERATIONS`, `HASH_PARALLELISM` - argon2
    ///   costs (defaults: 19456, 2, 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            user_cache_ttl: env_or("USER_CACHE_TTL", defaults.user_cache_ttl),
            item_cache_ttl: env_or("ITEM_CACHE_TTL", defaults.item_cache_ttl),
            items_all_cache_ttl: env_or("ITEMS_ALL_CACHE_TTL", defaults.items_all_cache_ttl),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            hash_params: HashParams {
                memory_kib: env_or("HASH_MEMORY_KIB", defaults.hash_params.memory_kib),
                iterations: env_or("HASH_ITERATIONS", defaults.hash_params.iterations),
                parallelism: env_or("HASH_PARALLELISM", defaults.hash_params.parallelism),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            max_entries: 1000,
            default_ttl: 300,
            user_cache_ttl: 3600,
            item_cache_ttl: 600,
            items_all_cache_ttl: 60,
            cleanup_interval: 1,
            hash_params: HashParams::default(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
