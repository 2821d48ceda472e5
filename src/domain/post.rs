use serde::{Deserialize, Serialize};

/// A timeline entry as returned by the API. Only the fields the widget
/// needs are read; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub id_str: Option<String>,
    pub user: Option<RawUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub screen_name: Option<String>,
}

impl RawPost {
    pub fn screen_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.screen_name.as_deref())
    }
}

/// A tweet ready for display: plain text, a formatted date and a permalink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPost {
    pub text: String,
    pub created_at: String,
    pub uri: String,
}

impl NormalizedPost {
    pub fn new(text: String, created_at: String, uri: String) -> Self {
        Self {
            text,
            created_at,
            uri,
        }
    }

    /// Permalink for a status, built from the author reported by the API
    pub fn permalink(host: &str, screen_name: &str, id: &str) -> String {
        format!("https://{}/{}/status/{}", host, screen_name, id)
    }
}
