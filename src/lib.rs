pub mod core;
pub mod gateway;

pub use crate::core::{config::GatewayConfig, errors::GatewayError, traits::TweetSource, types::*};
pub use crate::gateway::{LocalClient, RemoteClient, TcpTransport};
