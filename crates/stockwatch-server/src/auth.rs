//! Request authentication for the trigger endpoints.
//!
//! Two credentials are accepted: the commerce platform's webhook signature
//! (base64 HMAC-SHA256 of the raw request body, sent in
//! `X-Shopify-Hmac-Sha256`) for inbound store events, and a plain bearer
//! token for scheduler calls. Nothing runs unauthenticated.

use axum::http::HeaderMap;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

const SIGNATURE_HEADER: &str = "x-shopify-hmac-sha256";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credentials presented")]
    MissingCredentials,

    #[error("webhook signature did not verify")]
    BadSignature,

    #[error("bearer token did not match")]
    BadToken,

    #[error("no trigger credentials are configured")]
    NotConfigured,
}

/// Credential material the trigger surface checks requests against
#[derive(Debug, Clone, Default)]
pub struct TriggerAuth {
    /// Shared secret for webhook body signatures
    pub webhook_secret: Option<String>,
    /// Token expected from the scheduler in `Authorization: Bearer ...`
    pub api_token: Option<String>,
}

impl TriggerAuth {
    pub fn new(webhook_secret: Option<String>, api_token: Option<String>) -> Self {
        Self {
            webhook_secret,
            api_token,
        }
    }

    /// Check a request before it reaches the orchestrator
    ///
    /// A signature header is only honored when a webhook secret is
    /// configured, a bearer token only when an API token is; with neither
    /// configured everything is rejected rather than waved through.
    pub fn authorize(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), AuthError> {
        if self.webhook_secret.is_none() && self.api_token.is_none() {
            return Err(AuthError::NotConfigured);
        }

        if let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
            let secret = self.webhook_secret.as_deref().ok_or(AuthError::BadSignature)?;
            return verify_signature(secret, body, signature);
        }

        if let Some(bearer) = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
        {
            let expected = self.api_token.as_deref().ok_or(AuthError::BadToken)?;
            return verify_token(expected, bearer);
        }

        Err(AuthError::MissingCredentials)
    }
}

/// Verify a base64 HMAC-SHA256 body signature
fn verify_signature(secret: &str, body: &[u8], signature: &str) -> Result<(), AuthError> {
    let claimed = base64::engine::general_purpose::STANDARD
        .decode(signature)
        .map_err(|_| AuthError::BadSignature)?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take a key of any size so this cannot fail");
    mac.update(body);
    // verify_slice is constant-time, which is the whole point
    mac.verify_slice(&claimed).map_err(|_| AuthError::BadSignature)
}

/// Compare bearer tokens without leaking where they diverge
fn verify_token(expected: &str, presented: &str) -> Result<(), AuthError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(expected.as_bytes())
        .expect("HMAC can take a key of any size so this cannot fail");
    mac.update(b"bearer");
    let expected_tag = mac.finalize().into_bytes();

    let mut presented_mac = Hmac::<Sha256>::new_from_slice(presented.as_bytes())
        .expect("HMAC can take a key of any size so this cannot fail");
    presented_mac.update(b"bearer");

    if presented_mac.finalize().into_bytes() == expected_tag {
        Ok(())
    } else {
        Err(AuthError::BadToken)
    }
}

/// Sign a body the way the commerce platform does - used by tests and
/// handy for local curl sessions
pub fn sign_body(secret: &str, body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take a key of any size so this cannot fail");
    mac.update(body);
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}
