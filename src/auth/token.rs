use crate::error::AuthError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// Lifetimes are clamped so absurd `expires_in` values cannot overflow the timestamp.
const MAX_LIFETIME_SECS: u64 = 10 * 365 * 24 * 3600;

/// Token endpoint reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Short-lived bearer token and the instant it stops being accepted.
///
/// Tokens are replaced on refresh, never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let lifetime = chrono::Duration::seconds(response.expires_in.min(MAX_LIFETIME_SECS) as i64);
        Self::new(response.access_token, issued_at + lifetime)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Remaining lifetime; negative once expired.
    pub fn expires_in(&self) -> chrono::Duration {
        self.expires_at - Utc::now()
    }

    /// True while more than `margin` of lifetime remains.
    pub fn is_fresh(&self, margin: Duration) -> bool {
        let margin_ms = i64::try_from(margin.as_millis()).unwrap_or(i64::MAX);
        self.expires_in().num_milliseconds() > margin_ms
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// JWT header, decoded without signature verification.
    pub fn header(&self) -> Result<serde_json::Value, AuthError> {
        self.jwt_part(0)
    }

    /// JWT claims, decoded without signature verification.
    pub fn claims(&self) -> Result<serde_json::Value, AuthError> {
        self.jwt_part(1)
    }

    /// The `sub` claim (the user id for API-key tokens).
    pub fn subject(&self) -> Option<String> {
        self.claims()
            .ok()?
            .get("sub")
            .and_then(|v| v.as_str())
            .map(String::from)
    }

    fn jwt_part(&self, index: usize) -> Result<serde_json::Value, AuthError> {
        let parts: Vec<&str> = self.value.split('.').collect();
        if parts.len() != 3 {
            return Err(AuthError::InvalidToken("malformed JWT".into()));
        }
        let raw = URL_SAFE_NO_PAD
            .decode(parts[index].trim_end_matches('='))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        serde_json::from_slice(&raw).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
