use crate::domain::{Credentials, FetchConfig};
use crate::errors::TweetsResult;

#[cfg_attr(test, mockall::automock)]
pub trait TimelineSource: Send + Sync {
    /// Perform one signed timeline request and return the raw response body.
    /// Only transport failures are errors; the body is not interpreted.
    fn fetch(&self, config: &FetchConfig, credentials: &Credentials) -> TweetsResult<Vec<u8>>;
}
