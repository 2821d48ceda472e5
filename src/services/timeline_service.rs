use std::sync::Mutex;

use chrono::Duration;
use tracing::{debug, info, warn};

use crate::domain::{CacheEntry, Credentials, FetchConfig, NormalizedPost};
use crate::errors::{TweetsError, TweetsResult};
use crate::normalizer::Normalizer;
use crate::services::cache_service::CacheService;
use crate::sources::TimelineSource;
use crate::storage::traits::PostCacheStore;

/// Serves the tweet list from cache, refreshing it from the API on a miss.
///
/// Concurrent misses are collapsed: one caller fetches while the others
/// wait on the refresh lock and then read what it cached. Failures are
/// never cached, so the next call after an error tries the API again.
/// The slot is not keyed by `FetchConfig`; a live entry is returned whatever
/// handle or count the caller passes, so one service serves one configuration.
pub struct TimelineService<S: TimelineSource, R: PostCacheStore> {
    source: S,
    cache: CacheService<R>,
    normalizer: Normalizer,
    ttl: Duration,
    refresh_lock: Mutex<()>,
}

impl<S: TimelineSource, R: PostCacheStore> TimelineService<S, R> {
    pub fn new(source: S, cache: CacheService<R>, normalizer: Normalizer, ttl: Duration) -> Self {
        Self {
            source,
            cache,
            normalizer,
            ttl,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn get_posts(
        &self,
        config: &FetchConfig,
        credentials: &Credentials,
    ) -> TweetsResult<Vec<NormalizedPost>> {
        if let Some(posts) = self.cache.get() {
            debug!(count = posts.len(), "Serving tweets from cache");
            return Ok(posts);
        }

        let _guard = self
            .refresh_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another caller may have refreshed the slot while we waited
        if let Some(posts) = self.cache.get() {
            debug!(count = posts.len(), "Serving tweets refreshed by another caller");
            return Ok(posts);
        }

        info!(
            handle = %config.handle,
            count = config.request_count(),
            include_rts = config.include_reposts,
            "Fetching timeline"
        );

        let body = self.source.fetch(config, credentials).map_err(|e| {
            warn!(error = %e, "Timeline request failed");
            e
        })?;

        let posts = match self.normalizer.normalize(&body, config.display_count) {
            Ok(posts) => posts,
            Err(TweetsError::Upstream(message)) => {
                warn!(%message, "Timeline API returned an error");
                return Err(TweetsError::Upstream(message));
            }
            Err(e) => {
                warn!(error = %e, "Could not read timeline response");
                return Err(e);
            }
        };

        if let Err(e) = self.cache.set(posts.clone(), self.ttl) {
            warn!(error = %e, "Failed to cache tweets");
        }

        Ok(posts)
    }

    /// Operator action: drop the cached list so the next request refetches
    pub fn clear_cache(&self) -> TweetsResult<()> {
        self.cache.clear()?;
        info!("Tweet cache cleared");
        Ok(())
    }

    pub fn cache_entry(&self) -> TweetsResult<Option<CacheEntry>> {
        self.cache.entry()
    }

    pub fn cache(&self) -> &CacheService<R> {
        &self.cache
    }
}
