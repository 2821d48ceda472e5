pub mod credentials;
pub mod timeline;
pub mod post;
pub mod cache_entry;

pub use credentials::Credentials;
pub use timeline::{FetchConfig, FETCH_MARGIN};
pub use post::{NormalizedPost, RawPost, RawUser};
pub use cache_entry::{CacheEntry, CACHE_KEY};
