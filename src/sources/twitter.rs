use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, Request};
use reqwest::header::AUTHORIZATION;
use tracing::debug;

use crate::clock::Clock;
use crate::domain::{Credentials, FetchConfig};
use crate::errors::TweetsResult;
use crate::oauth::{percent_encode, OAuthSigner};
use crate::sources::traits::TimelineSource;

pub const DEFAULT_TIMELINE_URL: &str = "https://api.twitter.com/1.1/statuses/user_timeline.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TwitterTimelineSource {
    client: Client,
    signer: OAuthSigner,
    endpoint: String,
}

impl TwitterTimelineSource {
    pub fn new(endpoint: &str, timeout: Duration, clock: Arc<dyn Clock>) -> TweetsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("recent-tweets/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            signer: OAuthSigner::new(clock),
            endpoint: endpoint.to_string(),
        })
    }

    /// Query parameters in the order they are sent
    fn query_params(config: &FetchConfig) -> Vec<(&'static str, String)> {
        vec![
            ("screen_name", config.handle.clone()),
            ("count", config.request_count().to_string()),
            ("include_rts", config.include_rts_flag().to_string()),
        ]
    }

    fn query_string(params: &[(&str, &str)]) -> String {
        params
            .iter()
            .map(|(key, value)| format!("{}={}", key, percent_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Signed GET for the user timeline. The signature covers the endpoint
    /// without its query plus the same parameters sent on the URL.
    fn build_request(&self, config: &FetchConfig, credentials: &Credentials) -> TweetsResult<Request> {
        let owned = Self::query_params(config);
        let params: Vec<(&str, &str)> = owned.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let url = format!("{}?{}", self.endpoint, Self::query_string(&params));
        let authorization = self
            .signer
            .authorization_header("GET", &self.endpoint, &params, credentials);

        Ok(self
            .client
            .get(&url)
            .header(AUTHORIZATION, authorization)
            .build()?)
    }
}

impl TimelineSource for TwitterTimelineSource {
    fn fetch(&self, config: &FetchConfig, credentials: &Credentials) -> TweetsResult<Vec<u8>> {
        let request = self.build_request(config, credentials)?;

        debug!(url = %request.url(), "Requesting user timeline");

        let response = self.client.execute(request)?;

        let status = response.status();
        let body = response.bytes()?;

        debug!(status = status.as_u16(), bytes = body.len(), "Timeline response received");

        Ok(body.to_vec())
    }
}
