use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::domain::{CacheEntry, NormalizedPost, CACHE_KEY};
use crate::errors::{TweetsError, TweetsResult};
use crate::storage::traits::PostCacheStore;

/// Default lifetime of the cached tweet list
pub const DEFAULT_TTL_SECS: i64 = 12 * 60 * 60;

/// The single cache slot for the rendered tweet list. Expiry is lazy: an
/// expired entry is reported as absent on read and only replaced by the
/// next `set`.
pub struct CacheService<R: PostCacheStore> {
    store: R,
    clock: Arc<dyn Clock>,
}

impl<R: PostCacheStore> CacheService<R> {
    pub fn new(store: R, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Cached posts, if any and not yet expired. A backend failure is
    /// treated as a miss.
    pub fn get(&self) -> Option<Vec<NormalizedPost>> {
        let entry = match self.store.load(CACHE_KEY) {
            Ok(entry) => entry?,
            Err(e) => {
                warn!(error = %e, "Failed to read tweet cache, treating as empty");
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            debug!(expires_at = %entry.expires_at, "Cached tweets expired");
            return None;
        }

        Some(entry.value)
    }

    /// Overwrite the slot, expiring `ttl` from now. A `ttl` that pushes the
    /// expiry past the representable date range is rejected.
    pub fn set(&self, value: Vec<NormalizedPost>, ttl: Duration) -> TweetsResult<()> {
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or_else(|| TweetsError::InvalidInput(format!("cache TTL {} overflows the expiry date", ttl)))?;
        let entry = CacheEntry::new(value, expires_at);
        self.store.save(&entry)?;
        debug!(count = entry.value.len(), expires_at = %entry.expires_at, "Cached tweets");
        Ok(())
    }

    /// Empty the slot regardless of expiry
    pub fn clear(&self) -> TweetsResult<()> {
        self.store.delete(CACHE_KEY)
    }

    /// The stored entry, expired or not
    pub fn entry(&self) -> TweetsResult<Option<CacheEntry>> {
        self.store.load(CACHE_KEY)
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}
