//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! The signature covers the HTTP method, the base URL without its query
//! string, and every query and `oauth_*` parameter. The signing key is
//! derived from the consumer secret and the access token secret.
//!
//! [`OAuthSigner::sign`] is deterministic for a given nonce and timestamp;
//! [`OAuthSigner::authorization_header`] draws both itself.

use std::sync::Arc;

use data_encoding::BASE64;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::clock::Clock;
use crate::domain::Credentials;

type HmacSha1 = Hmac<Sha1>;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";

const NONCE_LENGTH: usize = 32;

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub struct OAuthSigner {
    clock: Arc<dyn Clock>,
}

impl OAuthSigner {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Build an `Authorization` header value with a fresh nonce and the
    /// current Unix timestamp.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        credentials: &Credentials,
    ) -> String {
        let nonce = generate_nonce();
        let timestamp = self.clock.now().timestamp();

        Self::sign(method, url, params, credentials, &nonce, timestamp)
    }

    /// Build an `Authorization` header value for the given nonce and timestamp
    pub fn sign(
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        credentials: &Credentials,
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let timestamp = timestamp.to_string();
        let mut oauth_params: Vec<(&str, &str)> = vec![
            ("oauth_consumer_key", credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", credentials.access_token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let mut all_params = oauth_params.clone();
        all_params.extend_from_slice(params);

        let base_string = Self::signature_base_string(method, url, &all_params);
        let signature = Self::signature(&base_string, credentials);

        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, percent_encode(value)))
            .collect();

        format!("OAuth {}", fields.join(", "))
    }

    /// `METHOD&enc(url)&enc(sorted k=v pairs)`
    pub fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(key, value)| (percent_encode(key), percent_encode(value)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(url),
            percent_encode(&param_string)
        )
    }

    fn signature(base_string: &str, credentials: &Credentials) -> String {
        let key = format!(
            "{}&{}",
            percent_encode(&credentials.consumer_secret),
            percent_encode(&credentials.access_token_secret)
        );

        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take a key of any size");
        mac.update(base_string.as_bytes());

        BASE64.encode(&mac.finalize().into_bytes())
    }
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};

    // Worked example from the API's "Creating a signature" documentation
    const URL: &str = "https://api.twitter.com/1/statuses/update.json";
    const NONCE: &str = "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg";
    const TIMESTAMP: i64 = 1318622958;

    fn credentials() -> Credentials {
        Credentials::new(
            "xvz1evFS4wEEPTGEFPHBog",
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        )
    }

    fn params() -> Vec<(&'static str, &'static str)> {
        vec![
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ("include_entities", "true"),
        ]
    }

    #[test]
    fn test_percent_encode_reserved_characters() {
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(percent_encode("!*'()"), "%21%2A%27%28%29");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_signature_base_string() {
        let creds = credentials();
        let mut all_params = vec![
            ("oauth_consumer_key", creds.consumer_key.as_str()),
            ("oauth_nonce", NONCE),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", "1318622958"),
            ("oauth_token", creds.access_token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];
        all_params.extend(params());

        let base = OAuthSigner::signature_base_string("post", URL, &all_params);

        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1%2Fstatuses%2Fupdate.json&\
             include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26\
             oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26\
             oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26\
             oauth_version%3D1.0%26\
             status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn test_sign_matches_documented_signature() {
        let header = OAuthSigner::sign("POST", URL, &params(), &credentials(), NONCE, TIMESTAMP);

        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_signature="tnnArxj06cWHq44gCs1OSKk%2FjLY%3D""#));
    }

    #[test]
    fn test_header_lists_all_oauth_fields_in_order() {
        let header = OAuthSigner::sign("POST", URL, &params(), &credentials(), NONCE, TIMESTAMP);
        let keys: Vec<&str> = header
            .trim_start_matches("OAuth ")
            .split(", ")
            .filter_map(|field| field.split('=').next())
            .collect();

        assert_eq!(
            keys,
            vec![
                "oauth_consumer_key",
                "oauth_nonce",
                "oauth_signature",
                "oauth_signature_method",
                "oauth_timestamp",
                "oauth_token",
                "oauth_version",
            ]
        );
        assert!(!header.contains("status="));
    }

    #[test]
    fn test_sign_is_deterministic() {
        let first = OAuthSigner::sign("GET", URL, &params(), &credentials(), NONCE, TIMESTAMP);
        let second = OAuthSigner::sign("GET", URL, &params(), &credentials(), NONCE, TIMESTAMP);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_credentials_still_sign() {
        let header = OAuthSigner::sign("GET", URL, &[], &Credentials::default(), NONCE, TIMESTAMP);
        assert!(header.contains(r#"oauth_consumer_key="""#));
        assert!(header.contains("oauth_signature=\""));
    }

    #[test]
    fn test_authorization_header_uses_clock_timestamp() {
        let clock = Arc::new(ManualClock::new(Utc.timestamp_opt(TIMESTAMP, 0).unwrap()));
        let signer = OAuthSigner::new(clock);

        let header = signer.authorization_header("GET", URL, &params(), &credentials());

        assert!(header.contains(r#"oauth_timestamp="1318622958""#));
    }

    #[test]
    fn test_nonce_is_fresh_alphanumeric() {
        let first = generate_nonce();
        let second = generate_nonce();

        assert_eq!(first.len(), NONCE_LENGTH);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
