//! OAuth 1.0a signature engine.
//!
//! Reproduces the upstream signing algorithm bit-for-bit: canonical parameter
//! string, signature base string, percent-encoded signing key, HMAC-SHA1
//! digest rendered as base64. Fully deterministic for fixed inputs, including
//! the timestamp and nonce carried in the protocol parameters.

use crate::core::errors::GatewayError;
use crate::core::kernel::percent::{percent_encode, EncodedParams};
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

pub const OAUTH_VERSION: &str = "1.0";
pub const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// The secret half of a credential pair: consumer secret plus token secret.
/// Supplied per call and never stored by the kernel.
#[derive(Debug, Clone, Copy)]
pub struct SigningSecrets<'a> {
    pub consumer_secret: &'a str,
    pub token_secret: &'a str,
}

/// Build the signature base string from the uppercased method, the base URL
/// (scheme + host + path, no query string) and the canonical parameter
/// string.
pub fn signature_base(method: &str, base_url: &str, params: &EncodedParams) -> String {
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&params.to_query_string())
    )
}

/// Compute the request signature over the merged protocol, query and body
/// parameters.
pub fn sign(
    secrets: SigningSecrets<'_>,
    method: &str,
    base_url: &str,
    oauth_params: &EncodedParams,
    query_params: &EncodedParams,
    body_params: &EncodedParams,
) -> Result<String, GatewayError> {
    let mut all_params = EncodedParams::new();
    all_params.extend(oauth_params);
    all_params.extend(query_params);
    all_params.extend(body_params);

    let base = signature_base(method, base_url, &all_params);
    let key = format!(
        "{}&{}",
        percent_encode(secrets.consumer_secret),
        percent_encode(secrets.token_secret)
    );

    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| GatewayError::AuthError(format!("Invalid signing key: {}", e)))?;
    mac.update(base.as_bytes());
    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the upstream API's "creating a signature"
    // documentation: fixed nonce and timestamp, known expected signature.
    fn known_vector_params() -> (EncodedParams, EncodedParams, EncodedParams) {
        let oauth = EncodedParams::from_raw([
            ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
            ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1318622958"),
            (
                "oauth_token",
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            ),
            ("oauth_version", "1.0"),
        ]);
        let query = EncodedParams::from_raw([("include_entities", "true")]);
        let body = EncodedParams::from_raw([(
            "status",
            "Hello Ladies + Gentlemen, a signed OAuth request!",
        )]);
        (oauth, query, body)
    }

    #[test]
    fn test_signature_base_string() {
        let (oauth, query, body) = known_vector_params();
        let mut all = EncodedParams::new();
        all.extend(&oauth);
        all.extend(&query);
        all.extend(&body);

        let base = signature_base(
            "post",
            "https://api.twitter.com/1.1/statuses/update.json",
            &all,
        );
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&\
             include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26\
             oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26\
             oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26\
             oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen\
             %252C%2520a%2520signed%2520OAuth%2520request%2521"
        );
    }

    #[test]
    fn test_known_vector_signature() {
        let (oauth, query, body) = known_vector_params();
        let secrets = SigningSecrets {
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
        };
        let signature = sign(
            secrets,
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &oauth,
            &query,
            &body,
        )
        .unwrap();
        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_signature_deterministic() {
        let (oauth, query, body) = known_vector_params();
        let secrets = SigningSecrets {
            consumer_secret: "secret",
            token_secret: "token",
        };
        let first = sign(secrets, "GET", "https://example.com/a", &oauth, &query, &body).unwrap();
        let second = sign(secrets, "GET", "https://example.com/a", &oauth, &query, &body).unwrap();
        assert_eq!(first, second);
    }
}
