//! Binary RPC transport.
//!
//! Messages use postcard serialization with length-prefixed framing (4-byte
//! big-endian). The frame boundary guarantees a reader never sees a partial
//! message regardless of how the underlying stream chunks bytes.

use crate::core::errors::GatewayError;
use crate::gateway::wire::{GatewayRequest, GatewayResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Upper bound on a single frame, requests and responses alike.
pub const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

/// Read a length-prefixed message from a stream.
///
/// Format: `[u32 big-endian length][postcard-encoded body]`
pub async fn read_message<T, R>(reader: &mut R, max_size: usize) -> Result<T, GatewayError>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .await
        .map_err(|e| GatewayError::TransportError(format!("failed to read frame length: {}", e)))?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > max_size {
        return Err(GatewayError::TransportError(format!(
            "frame too large: {} > {}",
            len, max_size
        )));
    }

    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|e| GatewayError::TransportError(format!("failed to read frame body: {}", e)))?;

    postcard::from_bytes(&buf)
        .map_err(|e| GatewayError::TransportError(format!("failed to deserialize frame: {}", e)))
}

/// Write a length-prefixed message to a stream.
///
/// Format: `[u32 big-endian length][postcard-encoded body]`
pub async fn write_message<T, W>(
    writer: &mut W,
    message: &T,
    max_size: usize,
) -> Result<(), GatewayError>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let buf = postcard::to_allocvec(message)
        .map_err(|e| GatewayError::TransportError(format!("failed to serialize frame: {}", e)))?;

    if buf.len() > max_size {
        return Err(GatewayError::TransportError(format!(
            "frame too large: {} > {}",
            buf.len(),
            max_size
        )));
    }

    let len = buf.len() as u32;
    writer
        .write_all(&len.to_be_bytes())
        .await
        .map_err(|e| GatewayError::TransportError(format!("failed to write frame length: {}", e)))?;
    writer
        .write_all(&buf)
        .await
        .map_err(|e| GatewayError::TransportError(format!("failed to write frame body: {}", e)))?;
    writer
        .flush()
        .await
        .map_err(|e| GatewayError::TransportError(format!("failed to flush frame: {}", e)))?;

    Ok(())
}

/// One request/response exchange with a remote gateway process.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}

/// Transport over a long-lived TCP connection.
///
/// The connection handle is shared across concurrent calls; the protocol has
/// no multiplexing or correlation ids, so calls take the stream lock one at
/// a time and each must run its request/response exchange to completion. An
/// exchange abandoned mid-flight (cancelled, timed out, or failed partway)
/// leaves an unread or half-written frame on the stream, so the connection
/// is marked unusable and every later call fails until the caller
/// reconnects. Stale frames are never handed to the wrong call.
pub struct TcpTransport {
    conn: Mutex<Connection>,
    peer: String,
}

struct Connection {
    stream: TcpStream,
    /// Set for the duration of an exchange; still set on the next lock
    /// acquisition means the previous exchange never completed.
    in_flight: bool,
}

impl TcpTransport {
    /// Connect to a remote gateway at `addr` (host:port).
    pub async fn connect(addr: &str) -> Result<Self, GatewayError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| GatewayError::TransportError(format!("connect to {}: {}", addr, e)))?;
        Ok(Self {
            conn: Mutex::new(Connection {
                stream,
                in_flight: false,
            }),
            peer: addr.to_string(),
        })
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    #[instrument(skip(self, request), fields(peer = %self.peer))]
    async fn call(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let mut conn = self.conn.lock().await;
        if conn.in_flight {
            return Err(GatewayError::TransportError(format!(
                "connection to {} desynchronized by an abandoned call, reconnect required",
                self.peer
            )));
        }
        conn.in_flight = true;
        write_message(&mut conn.stream, request, MAX_FRAME_BYTES).await?;
        let response = read_message(&mut conn.stream, MAX_FRAME_BYTES).await?;
        conn.in_flight = false;
        debug!("received gateway response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::wire::{ErrorMessage, ErrorReason, FetchTweetRequest};

    #[tokio::test]
    async fn test_frame_round_trip() {
        let (mut client, mut server) = tokio::io::duplex(1024);

        let request = GatewayRequest::FetchTweet(FetchTweetRequest {
            id: 20,
            ..FetchTweetRequest::default()
        });
        write_message(&mut client, &request, MAX_FRAME_BYTES)
            .await
            .unwrap();

        let received: GatewayRequest = read_message(&mut server, MAX_FRAME_BYTES).await.unwrap();
        assert_eq!(received, request);
    }

    #[tokio::test]
    async fn test_oversized_frame_rejected() {
        let (mut client, _server) = tokio::io::duplex(1024);
        let message = GatewayResponse::Error(ErrorMessage {
            reason: ErrorReason::Other,
            message: "x".repeat(64),
        });
        let err = write_message(&mut client, &message, 16).await.unwrap_err();
        assert!(matches!(err, GatewayError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_abandoned_exchange_poisons_connection() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            // accept and hold the connection open without ever answering
            let _stream = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let transport = TcpTransport::connect(&addr).await.unwrap();
        let request = GatewayRequest::FetchTweet(FetchTweetRequest::default());

        // dropping the exchange mid-flight leaves the response unread
        let abandoned = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            transport.call(&request),
        )
        .await;
        assert!(abandoned.is_err());

        let err = transport.call(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::TransportError(_)));
        assert!(err.to_string().contains("desynchronized"));
    }

    #[tokio::test]
    async fn test_truncated_stream_is_transport_error() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(&8u32.to_be_bytes()).await.unwrap();
        client.write_all(&[1, 2, 3]).await.unwrap();
        drop(client);

        let result: Result<GatewayRequest, _> = read_message(&mut server, MAX_FRAME_BYTES).await;
        assert!(matches!(result, Err(GatewayError::TransportError(_))));
    }
}
