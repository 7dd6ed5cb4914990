use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Half-open pair of character offsets locating an entity within tweet text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indices {
    pub start: u32,
    pub end: u32,
}

impl Indices {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

/// A link entity: the wrapped short URL plus its display and expanded forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    pub indices: Indices,
    pub url: String,
    pub display_url: String,
    pub expanded_url: String,
}

/// A user mention entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub indices: Indices,
    pub user_id: u64,
    pub user_handle: String,
    pub user_display_name: String,
}

/// A hashtag or cashtag entity. Both share the same shape upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntity {
    pub indices: Indices,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub position: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub end_time: DateTime<Utc>,
    pub duration: Duration,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSize {
    pub width: u32,
    pub height: u32,
    /// Upstream resize strategy for this variant, "fit" or "crop".
    pub resize: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: UrlEntity,
    pub id: u64,
    pub media_type: String,
    pub media_url: String,
    pub alt: String,
    /// Id of the tweet this media was originally attached to, when it was
    /// reposted from elsewhere.
    pub source_tweet_id: Option<u64>,
    pub thumb: MediaSize,
    pub small: MediaSize,
    pub medium: MediaSize,
    pub large: MediaSize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub handle: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub bio: String,
    pub url: String,
    pub location: String,
    pub protected: bool,
    pub verified: bool,
    pub follower_count: u32,
    pub following_count: u32,
    pub listed_count: u32,
    pub favorites_count: u32,
    pub statuses_count: u32,
    pub profile_banner: String,
    pub profile_image: String,
    pub default_profile: bool,
    pub default_profile_image: bool,
    pub withheld_countries: Vec<String>,
    pub withheld_scope: String,
    /// Link entities found in the profile url field.
    pub url_urls: Vec<UrlEntity>,
    /// Link entities found in the bio.
    pub bio_urls: Vec<UrlEntity>,
}

/// The tweet a reply points at. All three fields come from the upstream
/// representation together; a reply target with only some of them present is
/// treated as no reply at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyData {
    pub tweet_id: u64,
    pub user_id: u64,
    pub user_handle: String,
}

/// A fully decoded tweet, the caller-facing domain type.
///
/// Quoted and retweeted tweets nest recursively; the upstream API returns a
/// DAG in practice, and the translator enforces a depth cap on encode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub text_display_range: Indices,
    pub truncated: bool,
    pub source: String,
    pub user: User,
    pub replied_to: Option<ReplyData>,
    pub quoted: Option<Box<Tweet>>,
    pub retweeted: Option<Box<Tweet>>,
    pub quotes: u32,
    pub replies: u32,
    pub retweets: u32,
    pub likes: u32,
    pub current_user_liked: bool,
    pub current_user_retweeted: bool,
    pub current_user_retweet_id: Option<u64>,
    pub hashtags: Vec<SymbolEntity>,
    pub urls: Vec<UrlEntity>,
    pub mentions: Vec<Mention>,
    pub symbols: Vec<SymbolEntity>,
    pub media: Vec<Media>,
    pub polls: Vec<Poll>,
    pub possibly_sensitive: bool,
    pub filter_level: String,
    pub lang: String,
    pub withheld_copyright: bool,
    pub withheld_countries: Vec<String>,
    pub withheld_scope: String,
}

/// Which text representation the upstream API should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweetMode {
    /// Truncated 140-character view.
    Compatibility,
    /// Full-length text with the complete entity collections.
    #[default]
    Extended,
}

/// Per-call options for tweet lookups.
///
/// Immutable value type: each `with_*` call returns a modified copy, so
/// partially configured option sets never alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetOptions {
    trim_user: bool,
    include_my_retweet: bool,
    include_entities: bool,
    include_ext_alt_text: bool,
    include_card_uri: bool,
    mode: TweetMode,
}

impl Default for TweetOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TweetOptions {
    /// Defaults: include everything, full user objects, extended text.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trim_user: false,
            include_my_retweet: true,
            include_entities: true,
            include_ext_alt_text: true,
            include_card_uri: true,
            mode: TweetMode::Extended,
        }
    }

    #[must_use]
    pub fn with_trim_user(mut self, trim: bool) -> Self {
        self.trim_user = trim;
        self
    }

    #[must_use]
    pub fn with_my_retweet(mut self, include: bool) -> Self {
        self.include_my_retweet = include;
        self
    }

    #[must_use]
    pub fn with_entities(mut self, include: bool) -> Self {
        self.include_entities = include;
        self
    }

    #[must_use]
    pub fn with_alt_text(mut self, include: bool) -> Self {
        self.include_ext_alt_text = include;
        self
    }

    #[must_use]
    pub fn with_card_uri(mut self, include: bool) -> Self {
        self.include_card_uri = include;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: TweetMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn trim_user(&self) -> bool {
        self.trim_user
    }

    pub fn include_my_retweet(&self) -> bool {
        self.include_my_retweet
    }

    pub fn include_entities(&self) -> bool {
        self.include_entities
    }

    pub fn include_ext_alt_text(&self) -> bool {
        self.include_ext_alt_text
    }

    pub fn include_card_uri(&self) -> bool {
        self.include_card_uri
    }

    pub fn mode(&self) -> TweetMode {
        self.mode
    }

    /// Render the options as upstream query parameters.
    pub fn to_query_params(self) -> Vec<(String, String)> {
        let flag = |b: bool| if b { "true" } else { "false" }.to_string();
        vec![
            ("trim_user".to_string(), flag(self.trim_user)),
            ("include_my_retweet".to_string(), flag(self.include_my_retweet)),
            ("include_entities".to_string(), flag(self.include_entities)),
            (
                "include_ext_alt_text".to_string(),
                flag(self.include_ext_alt_text),
            ),
            ("include_card_uri".to_string(), flag(self.include_card_uri)),
            (
                "tweet_mode".to_string(),
                match self.mode {
                    TweetMode::Compatibility => "compat".to_string(),
                    TweetMode::Extended => "extended".to_string(),
                },
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts = TweetOptions::new();
        assert!(!opts.trim_user());
        assert!(opts.include_my_retweet());
        assert!(opts.include_entities());
        assert!(opts.include_ext_alt_text());
        assert!(opts.include_card_uri());
        assert_eq!(opts.mode(), TweetMode::Extended);
    }

    #[test]
    fn test_options_with_copies() {
        let base = TweetOptions::new();
        let trimmed = base.with_trim_user(true);
        // mutation-through-copy: the original is untouched
        assert!(!base.trim_user());
        assert!(trimmed.trim_user());
        assert_eq!(trimmed.with_trim_user(false), base);
    }

    #[test]
    fn test_options_query_params() {
        let params = TweetOptions::new()
            .with_trim_user(true)
            .with_mode(TweetMode::Compatibility)
            .to_query_params();
        assert!(params.contains(&("trim_user".to_string(), "true".to_string())));
        assert!(params.contains(&("tweet_mode".to_string(), "compat".to_string())));
        assert!(params.contains(&("include_entities".to_string(), "true".to_string())));
    }
}
