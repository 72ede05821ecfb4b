//! Cache Entry Module
//!
//! A cached JSON payload together with its expiry deadline.

use chrono::Utc;

// == Cache Entry ==
/// A single cached value. Every entry carries a deadline; there is no
/// "never expires" state.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload (JSON text)
    pub value: String,
    /// Insertion timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Deadline (Unix milliseconds); the entry is absent from this instant on
    pub expires_at: i64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl_seconds` from now.
    ///
    /// A TTL of zero yields an entry that is already expired.
    pub fn new(value: String, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();
        let ttl_ms = i64::try_from(ttl_seconds.saturating_mul(1000)).unwrap_or(i64::MAX);

        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against an explicit clock reading.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        let remaining = self.expires_at - current_timestamp_ms();
        u64::try_from(remaining).unwrap_or(0)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
