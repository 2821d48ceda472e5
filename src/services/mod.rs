pub mod cache_service;
pub mod timeline_service;

pub use cache_service::{CacheService, DEFAULT_TTL_SECS};
pub use timeline_service::TimelineService;
