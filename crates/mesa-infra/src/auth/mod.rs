//! Bearer token providers for the chat surface.
//!
//! - [`StaticTokenProvider`]: a fixed token handed over by the host. Never
//!   refreshes.
//! - [`SessionTokenProvider`]: a login session from the dashboard backend,
//!   refreshed through the hosted auth service when it expires or when the
//!   chat endpoint answers 401.
//!
//! [`TokenProvider`] wraps either one so callers can pick at runtime.

pub mod client;
pub mod provider;

use thiserror::Error;

use mesa_core::chat::provider::AuthTokenProvider;
use mesa_types::error::ChatError;

pub use client::AuthClient;
pub use provider::{SessionTokenProvider, StaticTokenProvider};

/// Errors from the login and refresh endpoints.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token refresh is not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-2xx answer. `message` is the server detail when present.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("invalid auth response: {0}")]
    Decode(String),

    #[error("not signed in")]
    NoSession,
}

impl From<AuthError> for ChatError {
    fn from(err: AuthError) -> Self {
        ChatError::Auth(err.to_string())
    }
}

/// Runtime choice of token provider.
pub enum TokenProvider {
    Static(StaticTokenProvider),
    Session(SessionTokenProvider),
}

impl AuthTokenProvider for TokenProvider {
    async fn token(&self) -> Result<Option<String>, ChatError> {
        match self {
            TokenProvider::Static(p) => p.token().await,
            TokenProvider::Session(p) => p.token().await,
        }
    }

    async fn on_unauthorized(&self) -> Result<Option<String>, ChatError> {
        match self {
            TokenProvider::Static(p) => p.on_unauthorized().await,
            TokenProvider::Session(p) => p.on_unauthorized().await,
        }
    }
}
