pub mod traits;
pub mod memory;
pub mod sqlite;

pub use traits::PostCacheStore;
pub use memory::InMemoryPostCacheStore;
pub use sqlite::{SqlitePostCacheRepository, SqliteStorage};
