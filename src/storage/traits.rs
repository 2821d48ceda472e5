use std::sync::Arc;

use crate::domain::CacheEntry;
use crate::errors::TweetsResult;

/// Backend holding the cached tweet list. Implementations only store and
/// return entries; expiry is decided by the cache service.
#[cfg_attr(test, mockall::automock)]
pub trait PostCacheStore: Send + Sync {
    fn load(&self, key: &str) -> TweetsResult<Option<CacheEntry>>;
    fn save(&self, entry: &CacheEntry) -> TweetsResult<()>;
    fn delete(&self, key: &str) -> TweetsResult<()>;
}

impl<T: PostCacheStore + ?Sized> PostCacheStore for Arc<T> {
    fn load(&self, key: &str) -> TweetsResult<Option<CacheEntry>> {
        (**self).load(key)
    }

    fn save(&self, entry: &CacheEntry) -> TweetsResult<()> {
        (**self).save(entry)
    }

    fn delete(&self, key: &str) -> TweetsResult<()> {
        (**self).delete(key)
    }
}
