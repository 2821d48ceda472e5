use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NormalizedPost;

/// Name of the single cache slot
pub const CACHE_KEY: &str = "go_recent_tweets";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: Vec<NormalizedPost>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: Vec<NormalizedPost>, expires_at: DateTime<Utc>) -> Self {
        Self {
            key: CACHE_KEY.to_string(),
            value,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
