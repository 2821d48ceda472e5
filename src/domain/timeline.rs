use crate::errors::{TweetsError, TweetsResult};

/// Extra tweets requested on top of the display count, since some of the
/// returned items may be dropped during normalization.
pub const FETCH_MARGIN: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub handle: String,
    pub display_count: u32,
    pub include_reposts: bool,
}

impl FetchConfig {
    pub fn new(handle: String, display_count: u32, include_reposts: bool) -> TweetsResult<Self> {
        if handle.trim().is_empty() {
            return Err(TweetsError::InvalidInput("Username must not be empty".to_string()));
        }

        if display_count == 0 {
            return Err(TweetsError::InvalidInput(
                "Number of tweets to display must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            handle,
            display_count,
            include_reposts,
        })
    }

    /// Value sent as the `count` query parameter
    pub fn request_count(&self) -> u32 {
        self.display_count.saturating_add(FETCH_MARGIN)
    }

    /// Value sent as the `include_rts` query parameter
    pub fn include_rts_flag(&self) -> &'static str {
        if self.include_reposts {
            "1"
        } else {
            "0"
        }
    }
}
