//! Authenticated request assembly.
//!
//! Turns an outbound request descriptor and a credential pair into a fully
//! authorized HTTP request: nonce, timestamp, protocol parameters, signature,
//! `Authorization` header, final URL and form body. No network I/O happens
//! here; the result is handed to the HTTP client by the caller.

use crate::core::errors::GatewayError;
use crate::core::kernel::percent::EncodedParams;
use crate::core::kernel::signer::{self, SigningSecrets, OAUTH_SIGNATURE_METHOD, OAUTH_VERSION};
use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes drawn for each request nonce.
pub const NONCE_BYTES: usize = 32;

/// One key/token half of a credential pair.
#[derive(Debug, Clone, Default)]
pub struct TokenPair {
    pub key: String,
    pub token: String,
}

impl TokenPair {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }
}

/// A full credential set: the secret pair used for signing and the public
/// pair sent in the protocol parameters. Supplied per call, never persisted.
#[derive(Debug, Clone, Default)]
pub struct AuthPair {
    pub secret: TokenPair,
    pub public: TokenPair,
}

/// Descriptor for one outbound request. Immutable once built and consumed
/// exactly once by [`OauthRequest::sign`].
#[derive(Debug, Clone)]
pub struct OauthRequest {
    pub method: String,
    pub protocol: String,
    pub domain: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Vec<(String, String)>,
}

impl OauthRequest {
    pub fn new(
        method: impl Into<String>,
        protocol: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            protocol: protocol.into(),
            domain: domain.into(),
            path: path.into(),
            query: Vec::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<(String, String)>) -> Self {
        self.body = body;
        self
    }

    fn base_url(&self) -> String {
        format!(
            "{}://{}/{}",
            self.protocol,
            self.domain.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    /// Assemble the fully authorized request.
    ///
    /// Generates a fresh nonce and timestamp, signs the merged parameter
    /// sets, and renders the `Authorization` header, final URL and form
    /// body. A failed randomness source aborts the call.
    pub fn sign(self, auth: &AuthPair) -> Result<SignedRequest, GatewayError> {
        let nonce = random_nonce()?;
        let timestamp = Utc::now().timestamp().to_string();

        let base_url = self.base_url();
        let query_params = EncodedParams::from_raw(self.query.iter().map(|(k, v)| (k, v)));
        let body_params = EncodedParams::from_raw(self.body.iter().map(|(k, v)| (k, v)));

        let mut oauth_params = EncodedParams::new();
        oauth_params.set("oauth_consumer_key", &auth.public.key);
        oauth_params.set("oauth_token", &auth.public.token);
        oauth_params.set("oauth_signature_method", OAUTH_SIGNATURE_METHOD);
        oauth_params.set("oauth_version", OAUTH_VERSION);
        oauth_params.set("oauth_timestamp", &timestamp);
        oauth_params.set("oauth_nonce", &nonce);

        let signature = signer::sign(
            SigningSecrets {
                consumer_secret: &auth.secret.key,
                token_secret: &auth.secret.token,
            },
            &self.method,
            &base_url,
            &oauth_params,
            &query_params,
            &body_params,
        )?;
        oauth_params.set("oauth_signature", &signature);

        let authorization = format!("OAuth {}", oauth_params.to_header_string());
        let url = if query_params.is_empty() {
            base_url
        } else {
            format!("{}?{}", base_url, query_params.to_query_string())
        };
        let body = body_params.to_query_string();

        let mut headers = vec![("Authorization".to_string(), authorization)];
        if !body.is_empty() {
            headers.push((
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
        }

        Ok(SignedRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}

/// A fully authorized outbound HTTP request, ready to hand to the HTTP
/// client.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SignedRequest {
    /// Convert into a reqwest request builder.
    pub fn into_reqwest(
        self,
        client: &reqwest::Client,
    ) -> Result<reqwest::RequestBuilder, GatewayError> {
        let method = reqwest::Method::from_bytes(self.method.to_uppercase().as_bytes())
            .map_err(|e| GatewayError::Other(format!("invalid HTTP method: {}", e)))?;
        let mut request = client.request(method, &self.url);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        if !self.body.is_empty() {
            request = request.body(self.body);
        }
        Ok(request)
    }
}

/// Draw `NONCE_BYTES` bytes from the system's secure random source and
/// render them in base-36. Randomness failure is fatal to the call.
fn random_nonce() -> Result<String, GatewayError> {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| GatewayError::AuthError(format!("randomness source failed: {}", e)))?;
    Ok(base36_encode(&bytes))
}

/// Encode a big-endian byte string as a base-36 integer, uppercase digits.
fn base36_encode(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut scratch = bytes.to_vec();
    let mut out: Vec<char> = Vec::new();
    while scratch.iter().any(|&b| b != 0) {
        let mut rem: u32 = 0;
        for byte in &mut scratch {
            let acc = (rem << 8) | u32::from(*byte);
            *byte = (acc / 36) as u8;
            rem = acc % 36;
        }
        out.push(DIGITS[rem as usize] as char);
    }
    if out.is_empty() {
        out.push('0');
    }
    out.iter().rev().collect()
}
