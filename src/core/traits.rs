use crate::core::{
    errors::GatewayError,
    types::{Tweet, TweetOptions},
};
use async_trait::async_trait;

/// The typed interface callers use to reach the upstream API.
///
/// Two interchangeable implementations exist: a local one that calls the
/// upstream REST API in-process, and a remote one that forwards the call to a
/// gateway process over the binary RPC transport.
#[async_trait]
pub trait TweetSource: Send + Sync {
    /// Fetch a single tweet by id.
    async fn get_tweet(&self, id: u64, options: TweetOptions) -> Result<Tweet, GatewayError>;
}
