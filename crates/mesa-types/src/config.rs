//! Client configuration types for Mesa.
//!
//! `ClientConfig` represents the `config.toml` that points the chat surface
//! at a dashboard backend and tunes its behaviour. Every field has a default,
//! so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the chat client.
///
/// Loaded from `~/.mesa/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Dashboard backend origin, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the chat endpoint on the backend.
    #[serde(default = "default_request_path")]
    pub request_path: String,

    /// Number of past entries forwarded with each request.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Refuse to send without a bearer token.
    #[serde(default = "default_true")]
    pub require_auth: bool,

    /// Reveal replies progressively instead of all at once.
    #[serde(default = "default_true")]
    pub stream_replies: bool,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub auth: AuthConfig,

    /// User-facing status strings.
    #[serde(default)]
    pub messages: SurfaceMessages,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_path() -> String {
    "/api/chat".to_string()
}

fn default_history_limit() -> usize {
    6
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_path: default_request_path(),
            history_limit: default_history_limit(),
            require_auth: true,
            stream_replies: true,
            request_timeout_secs: default_request_timeout_secs(),
            auth: AuthConfig::default(),
            messages: SurfaceMessages::default(),
        }
    }
}

/// Settings for the hosted auth service used to refresh sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Auth service origin (e.g. `https://<project>.supabase.co`).
    #[serde(default)]
    pub auth_url: Option<String>,

    /// Public anon key sent as the `apikey` header on refresh.
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Path of the dashboard login endpoint.
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            auth_url: None,
            anon_key: None,
            login_path: default_login_path(),
        }
    }
}

/// Status and fallback strings shown by the chat surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceMessages {
    pub sending: String,
    pub success: String,
    pub busy: String,
    pub no_context: String,
    pub empty_message: String,
    pub auth_required: String,
    pub generic_failure: String,
    pub reply_fallback: String,
}

impl Default for SurfaceMessages {
    fn default() -> Self {
        Self {
            sending: "Sending…".to_string(),
            success: "Reply received.".to_string(),
            busy: "A message is already being sent.".to_string(),
            no_context: "Select a restaurant to start chatting.".to_string(),
            empty_message: "Type a message before sending.".to_string(),
            auth_required: "Your session has expired. Please sign in again.".to_string(),
            generic_failure: "Something went wrong. Please try again.".to_string(),
            reply_fallback: "Reply unavailable.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_path, "/api/chat");
        assert_eq!(config.history_limit, 6);
        assert!(config.require_auth);
        assert!(config.stream_replies);
        assert_eq!(config.auth.login_path, "/api/auth/login");
    }

    #[test]
    fn test_client_config_deserialize_empty() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.history_limit, 6);
        assert_eq!(config.messages, SurfaceMessages::default());
        assert!(config.auth.auth_url.is_none());
        assert_eq!(config.auth.login_path, "/api/auth/login");
    }

    #[test]
    fn test_client_config_without_auth_table_keeps_login_path() {
        let config: ClientConfig = toml::from_str("base_url = \"https://dash.example.com\"").unwrap();
        assert_eq!(config.auth.login_path, "/api/auth/login");
        assert_eq!(AuthConfig::default().login_path, "/api/auth/login");
    }

    #[test]
    fn test_client_config_deserialize_with_values() {
        let toml_str = r#"
base_url = "https://dash.example.com"
history_limit = 2
require_auth = false
stream_replies = false

[auth]
auth_url = "https://abc.supabase.co"
anon_key = "anon"

[messages]
generic_failure = "Une erreur est survenue, réessayez."
"#;
        let config: ClientConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://dash.example.com");
        assert_eq!(config.history_limit, 2);
        assert!(!config.require_auth);
        assert!(!config.stream_replies);
        assert_eq!(config.request_path, "/api/chat");
        assert_eq!(config.auth.auth_url.as_deref(), Some("https://abc.supabase.co"));
        assert_eq!(config.auth.login_path, "/api/auth/login");
        assert_eq!(config.messages.generic_failure, "Une erreur est survenue, réessayez.");
        assert_eq!(config.messages.reply_fallback, "Reply unavailable.");
    }
}
