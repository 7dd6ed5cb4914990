//! In-process gateway client.
//!
//! Calls the upstream REST API directly over a signed request, then runs the
//! raw response through the full model → wire → domain translation so local
//! and remote callers see exactly the same shapes.

use crate::core::config::GatewayConfig;
use crate::core::errors::GatewayError;
use crate::core::kernel::{AuthPair, OauthRequest};
use crate::core::traits::TweetSource;
use crate::core::types::{Tweet, TweetOptions};
use crate::gateway::decode::decode_tweet;
use crate::gateway::encode::encode_tweet;
use crate::gateway::model;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{instrument, trace};

const DEFAULT_DOMAIN: &str = "api.twitter.com";
const SHOW_TWEET_PATH: &str = "/1.1/statuses/show.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct LocalClient {
    http: reqwest::Client,
    auth: AuthPair,
    protocol: String,
    domain: String,
}

impl LocalClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("wrengate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let (protocol, domain) = match &config.base_url {
            Some(base) => match base.split_once("://") {
                Some((protocol, domain)) => (protocol.to_string(), domain.to_string()),
                None => ("https".to_string(), base.clone()),
            },
            None => ("https".to_string(), DEFAULT_DOMAIN.to_string()),
        };

        Ok(Self {
            http,
            auth: super::auth_from_config(config),
            protocol,
            domain,
        })
    }
}

impl std::fmt::Debug for LocalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalClient")
            .field("protocol", &self.protocol)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TweetSource for LocalClient {
    #[instrument(skip(self, options), fields(domain = %self.domain, id = id))]
    async fn get_tweet(&self, id: u64, options: TweetOptions) -> Result<Tweet, GatewayError> {
        let mut query = options.to_query_params();
        query.push(("id".to_string(), id.to_string()));

        let signed = OauthRequest::new("GET", &self.protocol, &self.domain, SHOW_TWEET_PATH)
            .with_query(query)
            .sign(&self.auth)?;

        let response = signed.into_reqwest(&self.http)?.send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!("upstream response body: {}", body);

        if !status.is_success() {
            return Err(GatewayError::ApiError {
                code: i32::from(status.as_u16()),
                message: body,
            });
        }

        let raw: model::Tweet = serde_json::from_str(&body)?;
        let message = encode_tweet(&raw)?;
        Ok(decode_tweet(message))
    }
}
