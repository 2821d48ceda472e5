use thiserror::Error;

#[derive(Error, Debug)]
pub enum TweetsError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Transport(String),

    // Response errors
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("API returned an error: {0}")]
    Upstream(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cache storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for TweetsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TweetsError::Transport(format!("request timed out: {}", err))
        } else {
            TweetsError::Transport(err.to_string())
        }
    }
}

pub type TweetsResult<T> = Result<T, TweetsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_displayed() {
        let err = TweetsError::Upstream("Rate limit exceeded".to_string());
        assert_eq!(err.to_string(), "API returned an error: Rate limit exceeded");
    }

    #[test]
    fn test_storage_error_is_displayed() {
        let err = TweetsError::Storage("lock poisoned".to_string());
        assert_eq!(err.to_string(), "Cache storage error: lock poisoned");
    }
}
