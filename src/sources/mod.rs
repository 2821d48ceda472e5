pub mod traits;
pub mod twitter;

pub use traits::TimelineSource;
pub use twitter::{TwitterTimelineSource, DEFAULT_TIMELINE_URL, DEFAULT_TIMEOUT};
