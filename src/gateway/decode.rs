//! Wire message → domain translation.
//!
//! Decoding is defensive: it runs after a successful network round trip, so
//! absent nested messages become zero-valued records instead of errors and
//! minor upstream schema drift never crashes the caller. Tagged choices
//! decode into the same present/absent distinction used at encode time.

use crate::core::types::{
    Indices, Media, MediaSize, Mention, Poll, PollOption, ReplyData, SymbolEntity, Tweet,
    TweetMode, TweetOptions, UrlEntity, User,
};
use crate::gateway::wire::{
    IndicesMessage, MediaMessage, MediaSizeMessage, MentionMessage, PollMessage, SymbolMessage,
    TweetMessage, TweetModeMessage, TweetOptionsMessage, UrlMessage, UserMessage,
};
use chrono::{DateTime, Utc};
use std::time::Duration;

fn decode_timestamp(unix_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds, 0).unwrap_or_default()
}

pub fn decode_options(msg: TweetOptionsMessage) -> TweetOptions {
    TweetOptions::new()
        .with_trim_user(msg.trim_user)
        .with_my_retweet(msg.include_my_retweet)
        .with_entities(msg.include_entities)
        .with_alt_text(msg.include_ext_alt_text)
        .with_card_uri(msg.include_card_uri)
        .with_mode(match msg.mode {
            TweetModeMessage::Compat => TweetMode::Compatibility,
            TweetModeMessage::Extended => TweetMode::Extended,
        })
}

/// Decode a tweet message into the domain type.
pub fn decode_tweet(msg: TweetMessage) -> Tweet {
    Tweet {
        id: msg.id,
        created_at: decode_timestamp(msg.created_at),
        text: msg.text,
        text_display_range: decode_indices(msg.text_display_range),
        truncated: msg.truncated,
        source: msg.source,
        user: decode_user(msg.user),
        replied_to: msg.reply.into_option().map(|reply| ReplyData {
            tweet_id: reply.reply_to_tweet_id,
            user_id: reply.reply_to_user_id,
            user_handle: reply.reply_to_user_handle,
        }),
        quoted: msg
            .quote
            .into_option()
            .map(|quote| Box::new(decode_tweet(*quote))),
        retweeted: msg
            .retweet
            .into_option()
            .map(|retweet| Box::new(decode_tweet(*retweet))),
        quotes: msg.quote_count,
        replies: msg.reply_count,
        retweets: msg.retweet_count,
        likes: msg.favorite_count,
        current_user_liked: msg.favorited,
        current_user_retweeted: msg.retweeted,
        current_user_retweet_id: (msg.current_user_retweet_id != 0)
            .then_some(msg.current_user_retweet_id),
        hashtags: decode_symbols(msg.hashtags),
        urls: decode_urls(msg.urls),
        mentions: decode_mentions(msg.mentions),
        symbols: decode_symbols(msg.symbols),
        media: decode_media(msg.media),
        polls: decode_polls(msg.polls),
        possibly_sensitive: msg.possibly_sensitive,
        filter_level: msg.filter_level,
        lang: msg.lang,
        withheld_copyright: msg.withheld_copyright,
        withheld_countries: msg.withheld_countries,
        withheld_scope: msg.withheld_scope,
    }
}

pub fn decode_user(msg: Option<UserMessage>) -> User {
    let Some(msg) = msg else {
        return User::default();
    };
    User {
        id: msg.id,
        handle: msg.handle,
        display_name: msg.display_name,
        created_at: decode_timestamp(msg.created_at),
        bio: msg.bio,
        url: msg.url,
        location: msg.location,
        protected: msg.protected,
        verified: msg.verified,
        follower_count: msg.follower_count,
        following_count: msg.following_count,
        listed_count: msg.listed_count,
        favorites_count: msg.favorites_count,
        statuses_count: msg.statuses_count,
        profile_banner: msg.profile_banner,
        profile_image: msg.profile_image,
        default_profile: msg.default_profile,
        default_profile_image: msg.default_profile_image,
        withheld_countries: msg.withheld_countries,
        withheld_scope: msg.withheld_scope,
        url_urls: decode_urls(msg.url_urls),
        bio_urls: decode_urls(msg.bio_urls),
    }
}

pub fn decode_indices(msg: Option<IndicesMessage>) -> Indices {
    msg.map_or_else(Indices::default, |indices| Indices {
        start: indices.start,
        end: indices.end,
    })
}

pub fn decode_url(msg: Option<UrlMessage>) -> UrlEntity {
    let Some(msg) = msg else {
        return UrlEntity::default();
    };
    UrlEntity {
        indices: decode_indices(msg.indices),
        url: msg.url,
        display_url: msg.display_url,
        expanded_url: msg.expanded_url,
    }
}

fn decode_urls(msgs: Vec<UrlMessage>) -> Vec<UrlEntity> {
    msgs.into_iter().map(|msg| decode_url(Some(msg))).collect()
}

fn decode_mentions(msgs: Vec<MentionMessage>) -> Vec<Mention> {
    msgs.into_iter()
        .map(|msg| Mention {
            indices: decode_indices(msg.indices),
            user_id: msg.user_id,
            user_handle: msg.handle,
            user_display_name: msg.display_name,
        })
        .collect()
}

fn decode_symbols(msgs: Vec<SymbolMessage>) -> Vec<SymbolEntity> {
    msgs.into_iter()
        .map(|msg| SymbolEntity {
            indices: decode_indices(msg.indices),
            text: msg.text,
        })
        .collect()
}

fn decode_polls(msgs: Vec<PollMessage>) -> Vec<Poll> {
    msgs.into_iter()
        .map(|msg| Poll {
            end_time: decode_timestamp(msg.end_time),
            duration: Duration::from_secs(u64::from(msg.duration_minutes) * 60),
            options: msg
                .options
                .into_iter()
                .map(|option| PollOption {
                    position: option.position,
                    text: option.text,
                })
                .collect(),
        })
        .collect()
}

fn decode_media_size(msg: Option<MediaSizeMessage>) -> MediaSize {
    msg.map_or_else(MediaSize::default, |size| MediaSize {
        width: size.width,
        height: size.height,
        resize: size.resize,
    })
}

fn decode_media(msgs: Vec<MediaMessage>) -> Vec<Media> {
    msgs.into_iter()
        .map(|msg| Media {
            url: decode_url(msg.url),
            id: msg.id,
            media_type: msg.media_type,
            media_url: msg.media_url,
            alt: msg.alt,
            source_tweet_id: msg.source.into_option(),
            thumb: decode_media_size(msg.thumb),
            small: decode_media_size(msg.small),
            medium: decode_media_size(msg.medium),
            large: decode_media_size(msg.large),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::wire::{ReplyMessage, Tagged};

    #[test]
    fn test_absent_nested_messages_decode_to_zero_values() {
        let tweet = decode_tweet(TweetMessage {
            id: 9,
            ..TweetMessage::default()
        });
        assert_eq!(tweet.id, 9);
        assert_eq!(tweet.user, User::default());
        assert_eq!(tweet.text_display_range, Indices::default());
        assert_eq!(tweet.replied_to, None);
        assert_eq!(tweet.quoted, None);
        assert_eq!(tweet.retweeted, None);
    }

    #[test]
    fn test_no_reply_distinct_from_zeroed_reply() {
        let absent = decode_tweet(TweetMessage::default());
        assert_eq!(absent.replied_to, None);

        let zeroed = decode_tweet(TweetMessage {
            reply: Tagged::Present(ReplyMessage::default()),
            ..TweetMessage::default()
        });
        assert_eq!(zeroed.replied_to, Some(ReplyData::default()));
    }

    #[test]
    fn test_zero_retweet_id_means_absent() {
        let tweet = decode_tweet(TweetMessage {
            current_user_retweet_id: 0,
            ..TweetMessage::default()
        });
        assert_eq!(tweet.current_user_retweet_id, None);

        let tweet = decode_tweet(TweetMessage {
            current_user_retweet_id: 42,
            ..TweetMessage::default()
        });
        assert_eq!(tweet.current_user_retweet_id, Some(42));
    }

    #[test]
    fn test_invalid_timestamp_defaults_to_epoch() {
        let tweet = decode_tweet(TweetMessage {
            created_at: i64::MAX,
            ..TweetMessage::default()
        });
        assert_eq!(tweet.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_poll_duration_in_minutes() {
        let polls = decode_polls(vec![PollMessage {
            end_time: 0,
            duration_minutes: 90,
            options: vec![],
        }]);
        assert_eq!(polls[0].duration, Duration::from_secs(5400));
    }
}
