use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tracing::warn;

use crate::domain::{CacheEntry, NormalizedPost};
use crate::errors::TweetsResult;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::PostCacheStore;

pub struct SqlitePostCacheRepository {
    storage: SqliteStorage,
}

impl SqlitePostCacheRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl PostCacheStore for SqlitePostCacheRepository {
    fn load(&self, key: &str) -> TweetsResult<Option<CacheEntry>> {
        let conn = self.storage.connection()?;
        let row: Option<(String, i64)> = conn
            .query_row(
                "SELECT value, expires_at FROM post_cache WHERE cache_key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((value, expires_at_ms)) = row else {
            return Ok(None);
        };

        let Some(expires_at) = DateTime::<Utc>::from_timestamp_millis(expires_at_ms) else {
            warn!(key, expires_at_ms, "Ignoring cache row with out-of-range expiry");
            return Ok(None);
        };

        let value: Vec<NormalizedPost> = serde_json::from_str(&value)?;

        Ok(Some(CacheEntry {
            key: key.to_string(),
            value,
            expires_at,
        }))
    }

    fn save(&self, entry: &CacheEntry) -> TweetsResult<()> {
        let value = serde_json::to_string(&entry.value)?;
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO post_cache (cache_key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(cache_key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at,
                updated_at = datetime('now')",
            (&entry.key, &value, entry.expires_at.timestamp_millis()),
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> TweetsResult<()> {
        let conn = self.storage.connection()?;
        conn.execute("DELETE FROM post_cache WHERE cache_key = ?1", [key])?;
        Ok(())
    }
}
