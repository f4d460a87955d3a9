//! Access token claims.
//!
//! Reads the payload segment of the backend's JWT. The signature is not
//! checked here; the backend rejects forged tokens on every request.

use crate::types::Role;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a token could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not three dot-separated segments
    #[error("Token must have three segments, found {0}")]
    Malformed(usize),

    /// Payload is not base64url
    #[error("Token payload is not base64url: {0}")]
    Encoding(String),

    /// Payload is not the expected JSON
    #[error("Token payload is not valid claims JSON: {0}")]
    Json(String),
}

/// Claims carried in the token payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (the user's login)
    pub sub: String,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Issue time, seconds since the epoch
    #[serde(default)]
    pub iat: Option<i64>,
    /// Role granted to the subject
    #[serde(default)]
    pub role: Option<Role>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

impl TokenClaims {
    /// Read the claims of `token`.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Malformed`]: not `header.payload.signature`
    /// - [`TokenError::Encoding`]: payload is not base64url
    /// - [`TokenError::Json`]: payload does not hold the claims
    pub fn parse(token: &str) -> Result<Self, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [_, payload, _] = segments.as_slice() else {
            return Err(TokenError::Malformed(segments.len()));
        };

        // Some issuers pad the payload; the no-pad engine rejects '='.
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| TokenError::Json(e.to_string()))
    }

    /// When the token stops being accepted
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token has expired at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
