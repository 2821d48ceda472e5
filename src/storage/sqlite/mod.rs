mod connection;
mod post_cache_repository;

pub use connection::SqliteStorage;
pub use post_cache_repository::SqlitePostCacheRepository;
