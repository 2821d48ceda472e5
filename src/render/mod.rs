//! HTML rendering of the tweet list for the widget area.
//!
//! Tweet text goes through an ordered list of passes:
//!
//! 1. HTML-escape the plain text.
//! 2. Link `@mentions` to the user's profile.
//! 3. Autolink bare `http(s)://` URLs that are not already inside an anchor.
//!
//! Mentions are linked before URLs; pass 3 skips existing anchors so the
//! profile links from pass 2 are never wrapped a second time.

use regex::{Captures, Regex};

use crate::domain::NormalizedPost;
use crate::errors::TweetsResult;

pub const DEFAULT_PROFILE_HOST: &str = "twitter.com";

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '\''];

pub struct Renderer {
    profile_host: String,
    mention: Regex,
    anchor: Regex,
    url: Regex,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_HOST)
    }
}

impl Renderer {
    pub fn new(profile_host: &str) -> Self {
        Self {
            profile_host: profile_host.to_string(),
            mention: Regex::new(r"(?i)(^|[^a-z0-9_])@([a-z0-9_]+)").unwrap(),
            anchor: Regex::new(r"(?is)<a\b[^>]*>.*?</a>").unwrap(),
            url: Regex::new(r#"https?://[^\s<>"]+"#).unwrap(),
        }
    }

    /// Widget markup for a pipeline result. Errors and empty lists render
    /// as nothing; the end user never sees a failure.
    pub fn render_widget(&self, title: Option<&str>, posts: &TweetsResult<Vec<NormalizedPost>>) -> String {
        let posts = match posts {
            Ok(posts) if !posts.is_empty() => posts,
            _ => return String::new(),
        };

        let mut html = String::new();
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            html.push_str(&format!(
                "<h2 class=\"widget-title\">{}</h2>\n",
                html_escape::encode_text(title)
            ));
        }
        html.push_str(&self.render(posts));
        html
    }

    pub fn render(&self, posts: &[NormalizedPost]) -> String {
        if posts.is_empty() {
            return String::new();
        }

        let mut html = String::from("<div class=\"go-recent-tweets\">\n<ul>\n");

        for post in posts {
            html.push_str("<li>\n");
            html.push_str(&format!(
                "<p class=\"tweet-text\">{}</p>\n",
                self.render_text(&post.text)
            ));
            html.push_str(&format!(
                "<time class=\"tweet-meta\">On <a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></time>\n",
                html_escape::encode_double_quoted_attribute(&post.uri),
                html_escape::encode_text(&post.created_at)
            ));
            html.push_str("</li>\n");
        }

        html.push_str("</ul>\n</div>\n");
        html
    }

    pub fn render_text(&self, text: &str) -> String {
        let escaped = html_escape::encode_text(text);
        let mentioned = self.link_mentions(&escaped);
        self.link_urls(&mentioned)
    }

    fn link_mentions(&self, text: &str) -> String {
        let replacement = format!(
            "${{1}}<a href=\"https://{}/${{2}}\" target=\"_blank\" rel=\"noopener\">@${{2}}</a>",
            self.profile_host
        );
        self.mention.replace_all(text, replacement.as_str()).into_owned()
    }

    fn link_urls(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;

        for anchor in self.anchor.find_iter(text) {
            output.push_str(&self.autolink(&text[last..anchor.start()]));
            output.push_str(anchor.as_str());
            last = anchor.end();
        }
        output.push_str(&self.autolink(&text[last..]));

        output
    }

    fn autolink(&self, segment: &str) -> String {
        self.url
            .replace_all(segment, |caps: &Captures| {
                let matched = &caps[0];
                let url = matched.trim_end_matches(TRAILING_PUNCTUATION);
                let trailing = &matched[url.len()..];

                format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"nofollow noopener\">{}</a>{}",
                    url, url, trailing
                )
            })
            .into_owned()
    }
}
