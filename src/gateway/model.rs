//! Upstream API JSON model.
//!
//! Mirrors the wire shapes the upstream REST API actually returns: sprawling,
//! partially optional, recursively nested. Everything here is deserialize
//! only; the encoder in [`super::encode`] turns these into canonical wire
//! messages and nothing else ever touches them.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Upstream timestamps use a fixed legacy format, e.g.
/// `Wed Oct 10 20:19:24 +0000 2018`.
pub(crate) mod upstream_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&raw, FORMAT)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tweet {
    pub id: u64,
    #[serde(with = "upstream_date", default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub display_text_range: Vec<u32>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub user: User,
    #[serde(default)]
    pub in_reply_to_status_id: Option<u64>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<u64>,
    #[serde(default)]
    pub in_reply_to_screen_name: Option<String>,
    #[serde(default)]
    pub quoted_status: Option<Box<Tweet>>,
    #[serde(default)]
    pub retweeted_status: Option<Box<Tweet>>,
    #[serde(default)]
    pub quote_count: Option<u32>,
    #[serde(default)]
    pub reply_count: u32,
    #[serde(default)]
    pub retweet_count: u32,
    #[serde(default)]
    pub favorite_count: Option<u32>,
    #[serde(default)]
    pub favorited: bool,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub current_user_retweet: Option<TweetRef>,
    #[serde(default)]
    pub entities: TweetEntities,
    #[serde(default)]
    pub extended_entities: TweetExtendedEntities,
    #[serde(default)]
    pub extended_tweet: Option<ExtendedTweet>,
    #[serde(default)]
    pub possibly_sensitive: Option<bool>,
    #[serde(default)]
    pub filter_level: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub withheld_copyright: bool,
    #[serde(default)]
    pub withheld_in_countries: Vec<String>,
    #[serde(default)]
    pub withheld_scope: Option<String>,
}

/// Reference to another tweet by id, as found in `current_user_retweet`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetRef {
    pub id: u64,
}

/// The superseding long-form representation returned in compatibility mode
/// for tweets exceeding the classic length limit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedTweet {
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub display_text_range: Vec<u32>,
    #[serde(default)]
    pub entities: TweetEntities,
    #[serde(default)]
    pub extended_entities: TweetExtendedEntities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetEntities {
    #[serde(default)]
    pub hashtags: Vec<Symbol>,
    #[serde(default)]
    pub urls: Vec<Url>,
    #[serde(default, rename = "user_mentions")]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub polls: Vec<Poll>,
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetExtendedEntities {
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Url {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display_url: String,
    #[serde(default)]
    pub expanded_url: String,
    #[serde(default)]
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mention {
    pub id: u64,
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Symbol {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Poll {
    #[serde(with = "upstream_date", default, rename = "end_datetime")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollOption {
    pub position: u32,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    pub id: u64,
    #[serde(default, rename = "type")]
    pub media_type: String,
    // The link entity wrapping the media, same shape as any other url span.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub display_url: String,
    #[serde(default)]
    pub expanded_url: String,
    #[serde(default)]
    pub indices: Vec<u32>,
    #[serde(default)]
    pub media_url: String,
    #[serde(default)]
    pub media_url_https: String,
    #[serde(default)]
    pub sizes: MediaSizes,
    #[serde(default)]
    pub source_status_id: Option<u64>,
    #[serde(default)]
    pub ext_alt_text: Option<String>,
}

impl Media {
    /// The link entity portion of the media object.
    pub fn url_entity(&self) -> Url {
        Url {
            url: self.url.clone(),
            display_url: self.display_url.clone(),
            expanded_url: self.expanded_url.clone(),
            indices: self.indices.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSizes {
    #[serde(default)]
    pub thumb: MediaSize,
    #[serde(default)]
    pub small: MediaSize,
    #[serde(default)]
    pub medium: MediaSize,
    #[serde(default)]
    pub large: MediaSize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSize {
    #[serde(default)]
    pub w: u32,
    #[serde(default)]
    pub h: u32,
    #[serde(default)]
    pub resize: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(with = "upstream_date", default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default, rename = "friends_count")]
    pub following_count: u32,
    #[serde(default)]
    pub listed_count: u32,
    #[serde(default, rename = "favourites_count")]
    pub favorites_count: u32,
    #[serde(default)]
    pub statuses_count: u32,
    #[serde(default, rename = "profile_banner_url")]
    pub profile_banner: String,
    #[serde(default, rename = "profile_image_url_https")]
    pub profile_image: String,
    #[serde(default)]
    pub default_profile: bool,
    #[serde(default)]
    pub default_profile_image: bool,
    #[serde(default)]
    pub withheld_in_countries: Vec<String>,
    #[serde(default)]
    pub withheld_scope: Option<String>,
    #[serde(default)]
    pub entities: UserEntities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEntities {
    #[serde(default)]
    pub url: UserEntityList,
    #[serde(default)]
    pub description: UserEntityList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEntityList {
    #[serde(default)]
    pub urls: Vec<Url>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_upstream_date() {
        let tweet: Tweet = serde_json::from_value(serde_json::json!({
            "id": 20,
            "created_at": "Tue Mar 21 20:50:14 +0000 2006",
            "text": "just setting up my twttr",
            "user": {"id": 12, "screen_name": "jack"}
        }))
        .unwrap();
        assert_eq!(
            tweet.created_at,
            Utc.with_ymd_and_hms(2006, 3, 21, 20, 50, 14).unwrap()
        );
        assert_eq!(tweet.user.screen_name, "jack");
    }

    #[test]
    fn test_missing_optionals_default() {
        let tweet: Tweet = serde_json::from_value(serde_json::json!({
            "id": 1,
            "created_at": "Tue Mar 21 20:50:14 +0000 2006",
            "text": "minimal"
        }))
        .unwrap();
        assert!(tweet.full_text.is_none());
        assert!(tweet.quoted_status.is_none());
        assert!(tweet.entities.media.is_empty());
        assert!(tweet.display_text_range.is_empty());
    }
}
