//! Request-signing kernel.
//!
//! The kernel contains the transport-agnostic signing primitives shared by
//! every upstream operation:
//!
//! - `percent`: percent encoding and canonical parameter ordering
//! - `signer`: the signature base string and HMAC-SHA1 signature
//! - `request`: nonce generation and authorized request assembly
//!
//! Everything here is stateless and synchronous; the only external
//! dependency is the system's secure random source used for nonces.

pub mod percent;
pub mod request;
pub mod signer;

pub use percent::{percent_encode, EncodedParams};
pub use request::{AuthPair, OauthRequest, SignedRequest, TokenPair, NONCE_BYTES};
pub use signer::{SigningSecrets, OAUTH_SIGNATURE_METHOD, OAUTH_VERSION};
