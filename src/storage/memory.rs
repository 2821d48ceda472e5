use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::CacheEntry;
use crate::errors::{TweetsError, TweetsResult};
use crate::storage::traits::PostCacheStore;

/// Process-local cache backend; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryPostCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryPostCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> TweetsResult<MutexGuard<'_, HashMap<String, CacheEntry>>> {
        self.entries
            .lock()
            .map_err(|_| TweetsError::Storage("in-memory cache lock poisoned".to_string()))
    }
}

impl PostCacheStore for InMemoryPostCacheStore {
    fn load(&self, key: &str) -> TweetsResult<Option<CacheEntry>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn save(&self, entry: &CacheEntry) -> TweetsResult<()> {
        self.entries()?.insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> TweetsResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
