//! Cache Module
//!
//! Process-local key-value cache with per-entry TTL and a capacity bound,
//! used read-through by the user and item services.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Key Layout ==
/// Prefix shared by every cached user projection.
pub const USER_KEY_PREFIX: &str = "user:";

/// Prefix shared by every cached single item.
pub const ITEM_KEY_PREFIX: &str = "item:";

/// Aggregate entry holding the full item list.
pub const ALL_ITEMS_KEY: &str = "items:all";

/// Key of a cached user projection. Expects an already normalized email.
pub fn user_key(email: &str) -> String {
    format!("{}{}", USER_KEY_PREFIX, email)
}

pub fn item_key(id: &str) -> String {
    format!("{}{}", ITEM_KEY_PREFIX, id)
}
