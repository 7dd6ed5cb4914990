//! Upstream model → wire message translation.
//!
//! Encoding is strict: a malformed entity span aborts encoding of the whole
//! containing tweet, and failures propagate so no partial wire object is ever
//! produced. The extended representation, when present, supersedes the base
//! text, display range and entity collections.

use crate::core::errors::TranslationError;
use crate::core::kernel::AuthPair;
use crate::core::types::{TweetMode, TweetOptions};
use crate::gateway::model;
use crate::gateway::wire::{
    AuthMessage, IndicesMessage, MediaMessage, MediaSizeMessage, MentionMessage, PollMessage,
    PollOptionMessage, ReplyMessage, SymbolMessage, Tagged, TweetMessage, TweetModeMessage,
    TweetOptionsMessage, UrlMessage, UserMessage,
};
use std::collections::HashSet;

/// Upper bound on quote/repost nesting. The upstream API returns a DAG in
/// practice; the cap makes malformed cyclic input fail closed instead of
/// overflowing the stack.
pub const MAX_NEST_DEPTH: usize = 16;

pub fn encode_auth_pair(auth: &AuthPair) -> AuthMessage {
    AuthMessage {
        consumer_key: auth.public.key.clone(),
        access_token: auth.public.token.clone(),
        secret_key: auth.secret.key.clone(),
        secret_token: auth.secret.token.clone(),
    }
}

pub fn encode_options(options: TweetOptions) -> TweetOptionsMessage {
    TweetOptionsMessage {
        trim_user: options.trim_user(),
        include_my_retweet: options.include_my_retweet(),
        include_entities: options.include_entities(),
        include_ext_alt_text: options.include_ext_alt_text(),
        include_card_uri: options.include_card_uri(),
        mode: match options.mode() {
            TweetMode::Compatibility => TweetModeMessage::Compat,
            TweetMode::Extended => TweetModeMessage::Extended,
        },
    }
}

/// Encode an upstream tweet into its wire message.
pub fn encode_tweet(tweet: &model::Tweet) -> Result<TweetMessage, TranslationError> {
    encode_tweet_at_depth(tweet, 0)
}

fn encode_tweet_at_depth(
    tweet: &model::Tweet,
    depth: usize,
) -> Result<TweetMessage, TranslationError> {
    if depth > MAX_NEST_DEPTH {
        return Err(TranslationError::NestingTooDeep {
            max: MAX_NEST_DEPTH,
        });
    }

    let text = if let Some(extended) = &tweet.extended_tweet {
        extended.full_text.clone()
    } else if let Some(full_text) = tweet.full_text.as_ref().filter(|t| !t.is_empty()) {
        full_text.clone()
    } else {
        tweet.text.clone()
    };

    let display_range = tweet
        .extended_tweet
        .as_ref()
        .map_or(&tweet.display_text_range, |extended| {
            &extended.display_text_range
        });

    let (entities, extended_entities) = tweet.extended_tweet.as_ref().map_or(
        (&tweet.entities, &tweet.extended_entities),
        |extended| (&extended.entities, &extended.extended_entities),
    );

    let reply = match (
        tweet.in_reply_to_status_id,
        tweet.in_reply_to_user_id,
        &tweet.in_reply_to_screen_name,
    ) {
        (Some(tweet_id), Some(user_id), Some(handle)) => Tagged::Present(ReplyMessage {
            reply_to_tweet_id: tweet_id,
            reply_to_user_id: user_id,
            reply_to_user_handle: handle.clone(),
        }),
        _ => Tagged::Absent,
    };

    let quote = match &tweet.quoted_status {
        Some(quoted) => Tagged::Present(Box::new(encode_tweet_at_depth(quoted, depth + 1)?)),
        None => Tagged::Absent,
    };

    let retweet = match &tweet.retweeted_status {
        Some(retweeted) => Tagged::Present(Box::new(encode_tweet_at_depth(retweeted, depth + 1)?)),
        None => Tagged::Absent,
    };

    // Extended-collection media take precedence; each media id appears
    // exactly once, extended items first in their original order.
    let mut seen = HashSet::new();
    let mut media = Vec::new();
    for item in extended_entities
        .media
        .iter()
        .chain(entities.media.iter())
    {
        if seen.insert(item.id) {
            media.push(encode_media(item)?);
        }
    }

    Ok(TweetMessage {
        id: tweet.id,
        created_at: tweet.created_at.timestamp(),
        text,
        text_display_range: Some(encode_indices(display_range)?),
        truncated: tweet.truncated,
        source: tweet.source.clone(),
        user: Some(encode_user(&tweet.user)?),
        reply,
        quote,
        retweet,
        quote_count: tweet.quote_count.unwrap_or(0),
        reply_count: tweet.reply_count,
        retweet_count: tweet.retweet_count,
        favorite_count: tweet.favorite_count.unwrap_or(0),
        favorited: tweet.favorited,
        retweeted: tweet.retweeted,
        current_user_retweet_id: tweet.current_user_retweet.as_ref().map_or(0, |r| r.id),
        hashtags: encode_symbols(&entities.hashtags)?,
        urls: encode_urls(&entities.urls)?,
        mentions: encode_mentions(&entities.mentions)?,
        symbols: encode_symbols(&entities.symbols)?,
        media,
        polls: encode_polls(&entities.polls)?,
        possibly_sensitive: tweet.possibly_sensitive.unwrap_or(false),
        filter_level: tweet.filter_level.clone().unwrap_or_default(),
        lang: tweet.lang.clone().unwrap_or_default(),
        withheld_copyright: tweet.withheld_copyright,
        withheld_countries: tweet.withheld_in_countries.clone(),
        withheld_scope: tweet.withheld_scope.clone().unwrap_or_default(),
    })
}

pub fn encode_user(user: &model::User) -> Result<UserMessage, TranslationError> {
    Ok(UserMessage {
        id: user.id,
        handle: user.screen_name.clone(),
        display_name: user.name.clone(),
        created_at: user.created_at.timestamp(),
        bio: user.description.clone().unwrap_or_default(),
        url: user.url.clone().unwrap_or_default(),
        location: user.location.clone().unwrap_or_default(),
        protected: user.protected,
        verified: user.verified,
        follower_count: user.followers_count,
        following_count: user.following_count,
        listed_count: user.listed_count,
        favorites_count: user.favorites_count,
        statuses_count: user.statuses_count,
        profile_banner: user.profile_banner.clone(),
        profile_image: user.profile_image.clone(),
        default_profile: user.default_profile,
        default_profile_image: user.default_profile_image,
        withheld_countries: user.withheld_in_countries.clone(),
        withheld_scope: user.withheld_scope.clone().unwrap_or_default(),
        url_urls: encode_urls(&user.entities.url.urls)?,
        bio_urls: encode_urls(&user.entities.description.urls)?,
    })
}

/// Encode an offset span. Anything other than exactly two values is
/// malformed input and fails the translation.
pub fn encode_indices(indices: &[u32]) -> Result<IndicesMessage, TranslationError> {
    match indices {
        [start, end] => Ok(IndicesMessage {
            start: *start,
            end: *end,
        }),
        other => Err(TranslationError::MalformedSpan { count: other.len() }),
    }
}

pub fn encode_url(url: &model::Url) -> Result<UrlMessage, TranslationError> {
    Ok(UrlMessage {
        indices: Some(encode_indices(&url.indices)?),
        url: url.url.clone(),
        display_url: url.display_url.clone(),
        expanded_url: url.expanded_url.clone(),
    })
}

fn encode_urls(urls: &[model::Url]) -> Result<Vec<UrlMessage>, TranslationError> {
    urls.iter().map(encode_url).collect()
}

fn encode_mentions(mentions: &[model::Mention]) -> Result<Vec<MentionMessage>, TranslationError> {
    mentions
        .iter()
        .map(|mention| {
            Ok(MentionMessage {
                indices: Some(encode_indices(&mention.indices)?),
                user_id: mention.id,
                handle: mention.screen_name.clone(),
                display_name: mention.name.clone(),
            })
        })
        .collect()
}

fn encode_symbols(symbols: &[model::Symbol]) -> Result<Vec<SymbolMessage>, TranslationError> {
    symbols
        .iter()
        .map(|symbol| {
            Ok(SymbolMessage {
                indices: Some(encode_indices(&symbol.indices)?),
                text: symbol.text.clone(),
            })
        })
        .collect()
}

fn encode_polls(polls: &[model::Poll]) -> Result<Vec<PollMessage>, TranslationError> {
    polls
        .iter()
        .map(|poll| {
            Ok(PollMessage {
                end_time: poll.end_time.timestamp(),
                duration_minutes: poll.duration_minutes,
                options: poll
                    .options
                    .iter()
                    .map(|option| PollOptionMessage {
                        position: option.position,
                        text: option.text.clone(),
                    })
                    .collect(),
            })
        })
        .collect()
}

fn encode_media(media: &model::Media) -> Result<MediaMessage, TranslationError> {
    let size = |size: &model::MediaSize| MediaSizeMessage {
        width: size.w,
        height: size.h,
        resize: size.resize.clone(),
    };

    Ok(MediaMessage {
        url: Some(encode_url(&media.url_entity())?),
        id: media.id,
        media_type: media.media_type.clone(),
        media_url: if media.media_url_https.is_empty() {
            media.media_url.clone()
        } else {
            media.media_url_https.clone()
        },
        alt: media.ext_alt_text.clone().unwrap_or_default(),
        source: media.source_status_id.into(),
        thumb: Some(size(&media.sizes.thumb)),
        small: Some(size(&media.sizes.small)),
        medium: Some(size(&media.sizes.medium)),
        large: Some(size(&media.sizes.large)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_indices_requires_pair() {
        assert_eq!(
            encode_indices(&[]),
            Err(TranslationError::MalformedSpan { count: 0 })
        );
        assert_eq!(
            encode_indices(&[3]),
            Err(TranslationError::MalformedSpan { count: 1 })
        );
        assert_eq!(
            encode_indices(&[1, 2, 3]),
            Err(TranslationError::MalformedSpan { count: 3 })
        );
        assert_eq!(
            encode_indices(&[3, 10]),
            Ok(IndicesMessage { start: 3, end: 10 })
        );
    }

    #[test]
    fn test_nesting_cap_fails_closed() {
        let mut tweet = model::Tweet {
            id: 1,
            display_text_range: vec![0, 1],
            ..model::Tweet::default()
        };
        for id in 2..=(MAX_NEST_DEPTH as u64 + 3) {
            tweet = model::Tweet {
                id,
                display_text_range: vec![0, 1],
                quoted_status: Some(Box::new(tweet)),
                ..model::Tweet::default()
            };
        }
        assert_eq!(
            encode_tweet(&tweet),
            Err(TranslationError::NestingTooDeep {
                max: MAX_NEST_DEPTH
            })
        );
    }

    #[test]
    fn test_nested_span_error_propagates() {
        // malformed span inside a quoted tweet aborts the whole encode
        let quoted = model::Tweet {
            id: 2,
            display_text_range: vec![0, 1],
            entities: model::TweetEntities {
                hashtags: vec![model::Symbol {
                    text: "broken".to_string(),
                    indices: vec![4],
                }],
                ..model::TweetEntities::default()
            },
            ..model::Tweet::default()
        };
        let tweet = model::Tweet {
            id: 1,
            display_text_range: vec![0, 1],
            quoted_status: Some(Box::new(quoted)),
            ..model::Tweet::default()
        };
        assert_eq!(
            encode_tweet(&tweet),
            Err(TranslationError::MalformedSpan { count: 1 })
        );
    }

    #[test]
    fn test_extended_text_precedence() {
        let tweet = model::Tweet {
            id: 1,
            text: "truncated...".to_string(),
            full_text: Some("the full text".to_string()),
            display_text_range: vec![0, 12],
            extended_tweet: Some(model::ExtendedTweet {
                full_text: "the extended text".to_string(),
                display_text_range: vec![0, 17],
                ..model::ExtendedTweet::default()
            }),
            ..model::Tweet::default()
        };
        let msg = encode_tweet(&tweet).unwrap();
        assert_eq!(msg.text, "the extended text");
        assert_eq!(
            msg.text_display_range,
            Some(IndicesMessage { start: 0, end: 17 })
        );

        let tweet = model::Tweet {
            extended_tweet: None,
            ..tweet
        };
        assert_eq!(encode_tweet(&tweet).unwrap().text, "the full text");

        let tweet = model::Tweet {
            full_text: None,
            ..tweet
        };
        assert_eq!(encode_tweet(&tweet).unwrap().text, "truncated...");
    }

    fn media_with_id(id: u64) -> model::Media {
        model::Media {
            id,
            indices: vec![0, 1],
            ..model::Media::default()
        }
    }

    #[test]
    fn test_media_dedup_extended_first() {
        let tweet = model::Tweet {
            id: 1,
            display_text_range: vec![0, 1],
            entities: model::TweetEntities {
                media: vec![media_with_id(6), media_with_id(7)],
                ..model::TweetEntities::default()
            },
            extended_entities: model::TweetExtendedEntities {
                media: vec![media_with_id(5), media_with_id(6)],
            },
            ..model::Tweet::default()
        };
        let msg = encode_tweet(&tweet).unwrap();
        let ids: Vec<u64> = msg.media.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![5, 6, 7]);
    }

    #[test]
    fn test_media_url_prefers_https() {
        let media = model::Media {
            id: 1,
            indices: vec![0, 1],
            media_url: "http://img.example/one.png".to_string(),
            media_url_https: "https://img.example/one.png".to_string(),
            ..model::Media::default()
        };
        let msg = encode_media(&media).unwrap();
        assert_eq!(msg.media_url, "https://img.example/one.png");

        let media = model::Media {
            media_url_https: String::new(),
            ..media
        };
        let msg = encode_media(&media).unwrap();
        assert_eq!(msg.media_url, "http://img.example/one.png");
    }

    #[test]
    fn test_partial_reply_fields_encode_as_absent() {
        let tweet = model::Tweet {
            id: 1,
            display_text_range: vec![0, 1],
            in_reply_to_status_id: Some(10),
            in_reply_to_user_id: None,
            in_reply_to_screen_name: Some("someone".to_string()),
            ..model::Tweet::default()
        };
        let msg = encode_tweet(&tweet).unwrap();
        assert_eq!(msg.reply, Tagged::Absent);
    }
}
