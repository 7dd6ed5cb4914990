//! Remote gateway client.
//!
//! Forwards calls over the binary RPC transport to a separate gateway
//! process. Each call gets its own optional deadline. A timeout abandons the
//! in-flight exchange; the transport then refuses further use of the
//! desynchronized connection, so a later call can fail but never receives
//! another call's response. Upstream-HTTP-flavored failures reported through
//! the transport collapse into one generic internal error code, discarding
//! the original status granularity. Connection and timeout errors surface
//! unchanged.

use crate::core::errors::GatewayError;
use crate::core::kernel::AuthPair;
use crate::core::traits::TweetSource;
use crate::core::types::{Tweet, TweetOptions};
use crate::gateway::decode::decode_tweet;
use crate::gateway::encode::{encode_auth_pair, encode_options};
use crate::gateway::transport::Transport;
use crate::gateway::wire::{
    ErrorMessage, ErrorReason, FetchTweetRequest, GatewayRequest, GatewayResponse,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub struct RemoteClient<T: Transport> {
    transport: Arc<T>,
    auth: AuthPair,
    call_timeout: Option<Duration>,
}

impl<T: Transport> RemoteClient<T> {
    /// Wrap a connected transport. With no timeout, calls have no deadline.
    pub fn new(transport: Arc<T>, auth: AuthPair, call_timeout: Option<Duration>) -> Self {
        Self {
            transport,
            auth,
            call_timeout,
        }
    }

    async fn call(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        match self.call_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.transport.call(request))
                .await
                .map_err(|_| GatewayError::Timeout(timeout))?,
            None => self.transport.call(request).await,
        }
    }
}

impl<T: Transport> std::fmt::Debug for RemoteClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Transport> TweetSource for RemoteClient<T> {
    #[instrument(skip(self, options), fields(id = id))]
    async fn get_tweet(&self, id: u64, options: TweetOptions) -> Result<Tweet, GatewayError> {
        let request = GatewayRequest::FetchTweet(FetchTweetRequest {
            auth: encode_auth_pair(&self.auth),
            id,
            options: encode_options(options),
        });

        match self.call(&request).await? {
            GatewayResponse::Tweet(msg) => Ok(decode_tweet(*msg)),
            GatewayResponse::Error(err) => Err(map_gateway_error(err)),
        }
    }
}

/// Upstream HTTP failures collapse to the generic internal code; everything
/// else passes through as a transport error.
fn map_gateway_error(err: ErrorMessage) -> GatewayError {
    match err.reason {
        ErrorReason::UpstreamHttp { status } => {
            GatewayError::Internal(format!("upstream error {}: {}", status, err.message))
        }
        ErrorReason::Other => GatewayError::TransportError(err.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::TokenPair;
    use crate::gateway::wire::TweetMessage;
    use tokio::sync::Mutex;

    struct StubTransport {
        responses: Mutex<Vec<GatewayResponse>>,
        requests: Mutex<Vec<GatewayRequest>>,
    }

    impl StubTransport {
        fn new(responses: Vec<GatewayResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn call(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
            self.requests.lock().await.push(request.clone());
            self.responses
                .lock()
                .await
                .pop()
                .ok_or_else(|| GatewayError::TransportError("no response queued".to_string()))
        }
    }

    fn test_auth() -> AuthPair {
        AuthPair {
            secret: TokenPair::new("cs", "ts"),
            public: TokenPair::new("ck", "at"),
        }
    }

    #[tokio::test]
    async fn test_get_tweet_decodes_response() {
        let message = TweetMessage {
            id: 20,
            text: "just setting up my twttr".to_string(),
            ..TweetMessage::default()
        };
        let transport = Arc::new(StubTransport::new(vec![GatewayResponse::Tweet(Box::new(
            message,
        ))]));
        let client = RemoteClient::new(transport.clone(), test_auth(), None);

        let tweet = client.get_tweet(20, TweetOptions::new()).await.unwrap();
        assert_eq!(tweet.id, 20);
        assert_eq!(tweet.text, "just setting up my twttr");

        let requests = transport.requests.lock().await;
        let GatewayRequest::FetchTweet(request) = &requests[0];
        assert_eq!(request.id, 20);
        assert_eq!(request.auth.consumer_key, "ck");
        assert_eq!(request.auth.secret_token, "ts");
    }

    #[tokio::test]
    async fn test_upstream_http_error_collapses_to_internal() {
        let transport = Arc::new(StubTransport::new(vec![GatewayResponse::Error(
            ErrorMessage {
                reason: ErrorReason::UpstreamHttp { status: 429 },
                message: "rate limited".to_string(),
            },
        )]));
        let client = RemoteClient::new(transport, test_auth(), None);

        let err = client.get_tweet(1, TweetOptions::new()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let transport = Arc::new(StubTransport::new(vec![]));
        let client = RemoteClient::new(transport, test_auth(), None);

        let err = client.get_tweet(1, TweetOptions::new()).await.unwrap_err();
        assert!(matches!(err, GatewayError::TransportError(_)));
    }

    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn call(&self, _request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
            futures::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_call_timeout() {
        let client = RemoteClient::new(
            Arc::new(HangingTransport),
            test_auth(),
            Some(Duration::from_millis(10)),
        );
        let err = client.get_tweet(1, TweetOptions::new()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Timeout(_)));
    }
}
