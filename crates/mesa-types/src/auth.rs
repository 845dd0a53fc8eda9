//! Auth session returned by the dashboard login and token refresh endpoints.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair with expiry metadata.
///
/// `Debug` redacts both tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Unix timestamp (seconds). Derived from `expires_in` when absent.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl AuthSession {
    /// Absolute expiry, computing it from `issued_at + expires_in` when the
    /// server did not send `expires_at`.
    pub fn expiry(&self, issued_at: DateTime<Utc>) -> i64 {
        self.expires_at
            .unwrap_or_else(|| issued_at.timestamp() + self.expires_in)
    }

    /// Whether the access token expires within `leeway_secs` of `now`.
    ///
    /// A session with neither `expires_at` nor a positive `expires_in` never
    /// expires from the client's point of view.
    pub fn is_expired(&self, issued_at: DateTime<Utc>, now: DateTime<Utc>, leeway_secs: i64) -> bool {
        if self.expires_at.is_none() && self.expires_in <= 0 {
            return false;
        }
        now.timestamp() + leeway_secs >= self.expiry(issued_at)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
