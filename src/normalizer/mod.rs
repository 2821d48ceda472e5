use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use chrono_tz::Tz;
use scraper::Html;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{NormalizedPost, RawPost};
use crate::errors::{TweetsError, TweetsResult};

/// Timestamp format used by the timeline API, e.g. `Wed Oct 10 20:19:24 +0000 2018`
pub const UPSTREAM_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";
pub const DEFAULT_HOST: &str = "twitter.com";

/// Turns a timeline response body into display-ready posts.
///
/// Upstream order is assumed to be newest first and is preserved as-is;
/// no local re-sort happens.
#[derive(Debug, Clone)]
pub struct Normalizer {
    host: String,
    timezone: Tz,
    date_format: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timezone: Tz::UTC,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Normalizer {
    pub fn new(host: &str, timezone: Tz, date_format: &str) -> TweetsResult<Self> {
        let has_error = StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error));
        if has_error {
            return Err(TweetsError::Config(format!("Invalid date format: {}", date_format)));
        }

        Ok(Self {
            host: host.to_string(),
            timezone,
            date_format: date_format.to_string(),
        })
    }

    pub fn normalize(&self, body: &[u8], display_count: u32) -> TweetsResult<Vec<NormalizedPost>> {
        let json: Value = serde_json::from_slice(body)
            .map_err(|e| TweetsError::MalformedResponse(e.to_string()))?;

        let items = match json {
            Value::Array(items) => items,
            Value::Object(map) => return Err(Self::error_payload(&map)),
            other => {
                return Err(TweetsError::MalformedResponse(format!(
                    "expected an array of tweets, got {}",
                    json_kind(&other)
                )))
            }
        };

        let limit = display_count as usize;
        let mut posts = Vec::with_capacity(limit.min(items.len()));
        let mut skipped = 0usize;

        for item in items {
            if posts.len() >= limit {
                break;
            }

            match self.normalize_post(item) {
                Some(post) => posts.push(post),
                None => skipped += 1,
            }
        }

        debug!(accepted = posts.len(), skipped, "Normalized timeline");

        Ok(posts)
    }

    /// An object body is only meaningful as an `errors` payload
    fn error_payload(map: &Map<String, Value>) -> TweetsError {
        let message = map
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| {
                errors
                    .iter()
                    .find_map(|e| e.get("message").and_then(Value::as_str))
            });

        match message {
            Some(message) => TweetsError::Upstream(message.to_string()),
            None => TweetsError::MalformedResponse("unexpected object in response".to_string()),
        }
    }

    fn normalize_post(&self, item: Value) -> Option<NormalizedPost> {
        let raw: RawPost = serde_json::from_value(item).ok()?;
        let screen_name = raw.screen_name().filter(|s| !s.is_empty())?.to_string();
        let id = raw.id_str.filter(|id| !id.is_empty())?;
        let text = raw.text?;
        let created_at = DateTime::parse_from_str(&raw.created_at?, UPSTREAM_DATE_FORMAT).ok()?;

        let display_date = created_at
            .with_timezone(&self.timezone)
            .format(&self.date_format)
            .to_string();

        Some(NormalizedPost::new(
            sanitize_text(&text),
            display_date,
            NormalizedPost::permalink(&self.host, &screen_name, &id),
        ))
    }
}

/// Strip markup, decode entities and collapse whitespace
pub fn sanitize_text(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    let mut plain = String::new();

    for node in fragment.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            let in_raw_element = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style"))
            });
            if !in_raw_element {
                plain.push_str(text_node);
            }
        }
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" => plain.push(' '),
                _ => {}
            }
        }
    }

    plain.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
