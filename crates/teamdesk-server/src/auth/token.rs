//! HMAC-signed admin bearer tokens.
//!
//! Wire format: `base64url(json(claims)) "." hex(hmac_sha256(secret, payload))`,
//! where the MAC covers the encoded payload text. Base64 is unpadded.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AppResult;

type HmacSha256 = Hmac<Sha256>;

/// Role carried by every issued token.
pub const ADMIN_ROLE: &str = "admin";

/// Hex-encoded SHA-256 MAC length.
const SIGNATURE_HEX_LEN: usize = 64;

/// Claims embedded in an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub role: String,

    /// Issued at, unix seconds
    #[serde(default)]
    pub iat: i64,

    /// Expires at, unix seconds
    pub exp: i64,
}

/// Issues and verifies admin tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl_seconds: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl_seconds,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    fn signature(&self, payload: &str) -> String {
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &AdminClaims) -> AppResult<String> {
        let payload = BASE64URL.encode(serde_json::to_vec(claims)?);
        let signature = self.signature(&payload);
        Ok(format!("{}.{}", payload, signature))
    }

    /// Issue a fresh admin token for `username` at `now` (unix seconds).
    pub fn issue(&self, username: &str, now: i64) -> AppResult<String> {
        self.sign(&AdminClaims {
            username: username.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        })
    }

    /// Verify a token at `now`. Any defect yields `None`.
    pub fn verify(&self, token: &str, now: i64) -> Option<AdminClaims> {
        let (payload, signature) = token.split_once('.')?;
        if payload.is_empty() || signature.is_empty() || signature.contains('.') {
            return None;
        }
        if signature.len() != SIGNATURE_HEX_LEN {
            return None;
        }

        let provided = hex::decode(signature).ok()?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&provided).ok()?;

        let decoded = BASE64URL.decode(payload).ok()?;
        let claims: AdminClaims = serde_json::from_slice(&decoded).ok()?;
        if claims.exp < now {
            return None;
        }

        Some(claims)
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
