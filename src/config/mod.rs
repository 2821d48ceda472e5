use std::time::Duration;

use chrono_tz::Tz;
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::domain::{Credentials, FetchConfig};
use crate::errors::{TweetsError, TweetsResult};
use crate::normalizer::{Normalizer, DEFAULT_DATE_FORMAT, DEFAULT_HOST};
use crate::services::DEFAULT_TTL_SECS;
use crate::sources::{DEFAULT_TIMELINE_URL, DEFAULT_TIMEOUT};

pub const DEFAULT_DISPLAY_COUNT: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub username: String,
    pub display_count: u32,
    pub include_retweets: bool,
    pub cache_ttl: chrono::Duration,
    pub request_timeout: Duration,
    pub api_url: String,
    pub date_format: String,
    pub timezone: Tz,
    pub db_path: String,
    pub log_level: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> TweetsResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        // Default db_path is relative to executable directory
        let default_db_path = exe_dir
            .map(|d| d.join("recent-tweets.db").to_string_lossy().into_owned())
            .unwrap_or_else(|| "./recent-tweets.db".to_string());

        Self::from_lookup(|key| std::env::var(key).ok(), default_db_path)
    }

    /// Build a config from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F, default_db_path: String) -> TweetsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        // Missing credentials are signed as empty strings; the API rejects them
        let credentials = Credentials::new(
            var("TWITTER_CONSUMER_KEY").unwrap_or_default(),
            var("TWITTER_CONSUMER_SECRET").unwrap_or_default(),
            var("TWITTER_ACCESS_TOKEN").unwrap_or_default(),
            var("TWITTER_ACCESS_TOKEN_SECRET").unwrap_or_default(),
        );

        let display_count = match var("TWEETS_COUNT") {
            Some(v) => parse_number::<u32>("TWEETS_COUNT", &v)?,
            None => DEFAULT_DISPLAY_COUNT,
        };

        let include_retweets = match var("TWEETS_INCLUDE_RETWEETS") {
            Some(v) => parse_bool("TWEETS_INCLUDE_RETWEETS", &v)?,
            None => false,
        };

        let cache_ttl = match var("TWEETS_CACHE_TTL_SECS") {
            Some(v) => parse_ttl("TWEETS_CACHE_TTL_SECS", &v)?,
            None => chrono::Duration::seconds(DEFAULT_TTL_SECS),
        };

        let request_timeout = match var("TWEETS_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse_number::<u64>("TWEETS_TIMEOUT_SECS", &v)?),
            None => DEFAULT_TIMEOUT,
        };

        let api_url = var("TWEETS_API_URL").unwrap_or_else(|| DEFAULT_TIMELINE_URL.to_string());
        validate_api_url(&api_url)?;

        let timezone = match var("TWEETS_TIMEZONE") {
            Some(v) => v
                .parse::<Tz>()
                .map_err(|_| TweetsError::Config(format!("Unknown timezone: {}", v)))?,
            None => Tz::UTC,
        };

        Ok(Self {
            credentials,
            username: var("TWEETS_USERNAME").unwrap_or_default(),
            display_count,
            include_retweets,
            cache_ttl,
            request_timeout,
            api_url,
            date_format: var("TWEETS_DATE_FORMAT").unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            timezone,
            db_path: var("TWEETS_DB_PATH").unwrap_or(default_db_path),
            log_level: var("TWEETS_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn fetch_config(&self) -> TweetsResult<FetchConfig> {
        if self.username.is_empty() {
            return Err(TweetsError::MissingEnvVar("TWEETS_USERNAME".to_string()));
        }

        FetchConfig::new(self.username.clone(), self.display_count, self.include_retweets)
    }

    pub fn normalizer(&self) -> TweetsResult<Normalizer> {
        Normalizer::new(DEFAULT_HOST, self.timezone, &self.date_format)
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        self.cache_ttl
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> TweetsResult<T> {
    value
        .parse()
        .map_err(|_| TweetsError::Config(format!("{} must be a number, got {:?}", key, value)))
}

/// Non-negative seconds whose expiry, counted from now, is still a valid date
fn parse_ttl(key: &str, value: &str) -> TweetsResult<chrono::Duration> {
    let secs = parse_number::<i64>(key, value)?;
    if secs < 0 {
        return Err(TweetsError::Config(format!("{} must not be negative", key)));
    }

    chrono::Duration::try_seconds(secs)
        .filter(|ttl| SystemClock.now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| TweetsError::Config(format!("{} is too large, got {}", key, secs)))
}

fn parse_bool(key: &str, value: &str) -> TweetsResult<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(TweetsError::Config(format!(
            "{} must be 0 or 1, got {:?}",
            key, value
        ))),
    }
}

fn validate_api_url(value: &str) -> TweetsResult<()> {
    let url = Url::parse(value).map_err(|e| TweetsError::Config(format!("Invalid TWEETS_API_URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TweetsError::Config(format!(
            "TWEETS_API_URL must be http(s), got {}",
            url.scheme()
        )));
    }

    if url.query().is_some() {
        return Err(TweetsError::Config(
            "TWEETS_API_URL must not carry a query string".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> TweetsResult<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned(), "./test.db".to_string())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.display_count, 5);
        assert!(!config.include_retweets);
        assert_eq!(config.cache_ttl(), chrono::Duration::hours(12));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.api_url, DEFAULT_TIMELINE_URL);
        assert_eq!(config.timezone, Tz::UTC);
        assert_eq!(config.db_path, "./test.db");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.credentials, Credentials::default());
    }

    #[test]
    fn test_reads_all_settings() {
        let config = config_from(&[
            ("TWITTER_CONSUMER_KEY", "ck"),
            ("TWITTER_CONSUMER_SECRET", "cs"),
            ("TWITTER_ACCESS_TOKEN", "at"),
            ("TWITTER_ACCESS_TOKEN_SECRET", "ats"),
            ("TWEETS_USERNAME", "acme"),
            ("TWEETS_COUNT", "3"),
            ("TWEETS_INCLUDE_RETWEETS", "1"),
            ("TWEETS_CACHE_TTL_SECS", "600"),
            ("TWEETS_TIMEOUT_SECS", "4"),
            ("TWEETS_TIMEZONE", "Europe/Brussels"),
            ("TWEETS_DATE_FORMAT", "%d/%m/%Y"),
            ("TWEETS_DB_PATH", "/tmp/tweets.db"),
        ])
        .unwrap();

        assert_eq!(config.credentials, Credentials::new("ck", "cs", "at", "ats"));
        assert_eq!(config.username, "acme");
        assert_eq!(config.display_count, 3);
        assert!(config.include_retweets);
        assert_eq!(config.cache_ttl(), chrono::Duration::minutes(10));
        assert_eq!(config.request_timeout, Duration::from_secs(4));
        assert_eq!(config.timezone, chrono_tz::Europe::Brussels);
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert_eq!(config.db_path, "/tmp/tweets.db");
    }

    #[test]
    fn test_fetch_config_requires_username() {
        let config = config_from(&[]).unwrap();
        assert!(matches!(config.fetch_config(), Err(TweetsError::MissingEnvVar(_))));
    }

    #[test]
    fn test_fetch_config() {
        let config = config_from(&[("TWEETS_USERNAME", "acme"), ("TWEETS_COUNT", "2")]).unwrap();
        let fetch = config.fetch_config().unwrap();

        assert_eq!(fetch.handle, "acme");
        assert_eq!(fetch.request_count(), 12);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(config_from(&[("TWEETS_COUNT", "many")]), Err(TweetsError::Config(_))));
        assert!(matches!(
            config_from(&[("TWEETS_INCLUDE_RETWEETS", "maybe")]),
            Err(TweetsError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("TWEETS_TIMEZONE", "Mars/Olympus")]),
            Err(TweetsError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("TWEETS_CACHE_TTL_SECS", "-1")]),
            Err(TweetsError::Config(_))
        ));
    }

    #[test]
    fn test_oversized_cache_ttl_rejected() {
        for ttl in ["100000000000000", "9223372036854775807"] {
            let result = config_from(&[("TWEETS_CACHE_TTL_SECS", ttl)]);
            assert!(
                matches!(result, Err(TweetsError::Config(ref m)) if m.contains("too large")),
                "TTL {} was accepted",
                ttl
            );
        }

        let config = config_from(&[("TWEETS_CACHE_TTL_SECS", "0")]).unwrap();
        assert_eq!(config.cache_ttl(), chrono::Duration::zero());
    }

    #[test]
    fn test_api_url_validation() {
        assert!(config_from(&[("TWEETS_API_URL", "http://localhost:8080/timeline.json")]).is_ok());
        assert!(matches!(
            config_from(&[("TWEETS_API_URL", "ftp://example.com/x")]),
            Err(TweetsError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("TWEETS_API_URL", "https://example.com/x?count=1")]),
            Err(TweetsError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("TWEETS_API_URL", "not a url")]),
            Err(TweetsError::Config(_))
        ));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("TWEETS_COUNT", "  "), ("TWEETS_LOG", "")]).unwrap();
        assert_eq!(config.display_count, 5);
        assert_eq!(config.log_level, "info");
    }
}
