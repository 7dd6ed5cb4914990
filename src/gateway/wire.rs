//! Canonical wire messages for the gateway RPC protocol.
//!
//! These are the transport-agnostic shapes exchanged with a remote gateway
//! process. Mutually exclusive optional relationships (reply target, quote,
//! repost, media source) are carried as an explicit [`Tagged`] choice, never
//! a bare nullable, so a decoder can always distinguish "known absent" from
//! "missing or corrupt". Nested messages that are structurally optional use
//! `Option` and decode to zero-valued records when absent.

use serde::{Deserialize, Serialize};

/// Explicit two-variant choice for a mutually exclusive optional relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tagged<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Tagged<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Tagged<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMessage {
    pub consumer_key: String,
    pub access_token: String,
    pub secret_key: String,
    pub secret_token: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TweetModeMessage {
    Compat,
    #[default]
    Extended,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetOptionsMessage {
    pub trim_user: bool,
    pub include_my_retweet: bool,
    pub include_entities: bool,
    pub include_ext_alt_text: bool,
    pub include_card_uri: bool,
    pub mode: TweetModeMessage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicesMessage {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMessage {
    pub indices: Option<IndicesMessage>,
    pub url: String,
    pub display_url: String,
    pub expanded_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionMessage {
    pub indices: Option<IndicesMessage>,
    pub user_id: u64,
    pub handle: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMessage {
    pub indices: Option<IndicesMessage>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOptionMessage {
    pub position: u32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollMessage {
    /// Unix seconds.
    pub end_time: i64,
    pub duration_minutes: u32,
    pub options: Vec<PollOptionMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSizeMessage {
    pub width: u32,
    pub height: u32,
    pub resize: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMessage {
    pub url: Option<UrlMessage>,
    pub id: u64,
    pub media_type: String,
    pub media_url: String,
    pub alt: String,
    /// Id of the tweet the media was originally attached to, when reposted.
    pub source: Tagged<u64>,
    pub thumb: Option<MediaSizeMessage>,
    pub small: Option<MediaSizeMessage>,
    pub medium: Option<MediaSizeMessage>,
    pub large: Option<MediaSizeMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub id: u64,
    pub handle: String,
    pub display_name: String,
    /// Unix seconds.
    pub created_at: i64,
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
    pub url_urls: Vec<UrlMessage>,
    pub bio_urls: Vec<UrlMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessage {
    pub reply_to_tweet_id: u64,
    pub reply_to_user_id: u64,
    pub reply_to_user_handle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetMessage {
    pub id: u64,
    /// Unix seconds.
    pub created_at: i64,
    pub text: String,
    pub text_display_range: Option<IndicesMessage>,
    pub truncated: bool,
    pub source: String,
    pub user: Option<UserMessage>,
    pub reply: Tagged<ReplyMessage>,
    pub quote: Tagged<Box<TweetMessage>>,
    pub retweet: Tagged<Box<TweetMessage>>,
    pub quote_count: u32,
    pub reply_count: u32,
    pub retweet_count: u32,
    pub favorite_count: u32,
    pub favorited: bool,
    pub retweeted: bool,
    /// Id of the current user's own retweet of this tweet; 0 when absent.
    pub current_user_retweet_id: u64,
    pub hashtags: Vec<SymbolMessage>,
    pub urls: Vec<UrlMessage>,
    pub mentions: Vec<MentionMessage>,
    pub symbols: Vec<SymbolMessage>,
    pub media: Vec<MediaMessage>,
    pub polls: Vec<PollMessage>,
    pub possibly_sensitive: bool,
    pub filter_level: String,
    pub lang: String,
    pub withheld_copyright: bool,
    pub withheld_countries: Vec<String>,
    pub withheld_scope: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchTweetRequest {
    pub auth: AuthMessage,
    pub id: u64,
    pub options: TweetOptionsMessage,
}

/// Top-level request envelope sent to a remote gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayRequest {
    FetchTweet(FetchTweetRequest),
}

/// Why a remote call failed, as reported through the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorReason {
    /// The gateway's own upstream HTTP call failed with this status.
    UpstreamHttp { status: u16 },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub reason: ErrorReason,
    pub message: String,
}

/// Top-level response envelope received from a remote gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GatewayResponse {
    Tweet(Box<TweetMessage>),
    Error(ErrorMessage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_defaults_absent() {
        let tagged: Tagged<u64> = Tagged::default();
        assert!(!tagged.is_present());
        assert_eq!(tagged.as_option(), None);
    }

    #[test]
    fn test_media_source_usable_as_full_equivalence() {
        // MediaMessage's Eq derive needs Tagged<u64> to be Eq as well
        fn assert_eq_impl<T: Eq>() {}
        assert_eq_impl::<MediaMessage>();

        let reposted = MediaMessage {
            source: Tagged::Present(777),
            ..MediaMessage::default()
        };
        assert_ne!(reposted, MediaMessage::default());
        assert_eq!(reposted, reposted.clone());
    }

    #[test]
    fn test_tagged_from_option() {
        assert_eq!(Tagged::from(Some(7u64)), Tagged::Present(7));
        assert_eq!(Tagged::from(None::<u64>), Tagged::Absent);
        assert_eq!(Tagged::Present(7u64).into_option(), Some(7));
    }

    #[test]
    fn test_tagged_absence_survives_serialization() {
        // Absent and "present but zero" must stay distinguishable on the wire
        let absent: Tagged<ReplyMessage> = Tagged::Absent;
        let zeroed = Tagged::Present(ReplyMessage::default());

        let absent_bytes = postcard::to_allocvec(&absent).unwrap();
        let zeroed_bytes = postcard::to_allocvec(&zeroed).unwrap();
        assert_ne!(absent_bytes, zeroed_bytes);

        let decoded: Tagged<ReplyMessage> = postcard::from_bytes(&absent_bytes).unwrap();
        assert_eq!(decoded, Tagged::Absent);
        let decoded: Tagged<ReplyMessage> = postcard::from_bytes(&zeroed_bytes).unwrap();
        assert_eq!(decoded, zeroed);
    }
}
