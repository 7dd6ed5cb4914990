//! Gateway clients and the model ↔ wire translation layer.
//!
//! Two interchangeable [`crate::core::traits::TweetSource`] implementations:
//! [`LocalClient`] signs and performs upstream REST calls in-process, and
//! [`RemoteClient`] forwards calls to a gateway process over the binary RPC
//! transport. Both return the same domain types, produced by the same
//! translation layer.

pub mod decode;
pub mod encode;
pub mod local;
pub mod model;
pub mod remote;
pub mod transport;
pub mod wire;

use crate::core::config::GatewayConfig;
use crate::core::errors::GatewayError;
use crate::core::kernel::{AuthPair, TokenPair};
use std::sync::Arc;
use std::time::Duration;

pub use local::LocalClient;
pub use remote::RemoteClient;
pub use transport::{TcpTransport, Transport};

fn auth_from_config(config: &GatewayConfig) -> AuthPair {
    AuthPair {
        secret: TokenPair::new(config.consumer_secret(), config.token_secret()),
        public: TokenPair::new(config.consumer_key(), config.access_token()),
    }
}

/// Create an in-process client that calls the upstream API directly.
pub fn build_local_client(config: &GatewayConfig) -> Result<LocalClient, GatewayError> {
    LocalClient::new(config)
}

/// Connect to a remote gateway process.
///
/// The connection is long-lived and shared across calls. With
/// `call_timeout = None`, calls have no deadline.
pub async fn connect_remote_client(
    addr: &str,
    config: &GatewayConfig,
    call_timeout: Option<Duration>,
) -> Result<RemoteClient<TcpTransport>, GatewayError> {
    let transport = Arc::new(TcpTransport::connect(addr).await?);
    Ok(RemoteClient::new(
        transport,
        auth_from_config(config),
        call_timeout,
    ))
}
