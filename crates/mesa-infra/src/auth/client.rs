//! HTTP client for the login and token refresh endpoints.
//!
//! Login goes to the dashboard backend (`POST {base_url}{login_path}`).
//! Refresh goes straight to the hosted auth service
//! (`POST {auth_url}/auth/v1/token?grant_type=refresh_token`) with the public
//! anon key in the `apikey` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, info};

use mesa_types::auth::AuthSession;
use mesa_types::config::ClientConfig;
use mesa_types::wire::TransportResponse;

use super::AuthError;

const REFRESH_PATH: &str = "/auth/v1/token?grant_type=refresh_token";

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    login_path: String,
    auth_url: Option<String>,
    anon_key: Option<SecretString>,
}

impl AuthClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_path: config.auth.login_path.clone(),
            auth_url: config
                .auth
                .auth_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
            anon_key: config.auth.anon_key.clone().map(SecretString::from),
        })
    }

    /// Whether `refresh` can be called at all.
    pub fn can_refresh(&self) -> bool {
        self.auth_url.is_some() && self.anon_key.is_some()
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthSession, AuthError> {
        let url = format!("{}{}", self.base_url, self.login_path);
        let response = self
            .client
            .post(&url)
            .json(&LoginBody {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let session = Self::read_session(response).await?;
        info!(email, "Signed in");
        Ok(session)
    }

    /// Exchange a refresh token for a new session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let auth_url = self.auth_url.as_deref().ok_or(AuthError::NotConfigured("auth.auth_url"))?;
        let anon_key = self.anon_key.as_ref().ok_or(AuthError::NotConfigured("auth.anon_key"))?;

        let response = self
            .client
            .post(format!("{auth_url}{REFRESH_PATH}"))
            .header("apikey", anon_key.expose_secret())
            .json(&RefreshBody { refresh_token })
            .send()
            .await?;

        let session = Self::read_session(response).await?;
        debug!("Auth session refreshed");
        Ok(session)
    }

    async fn read_session(response: reqwest::Response) -> Result<AuthSession, AuthError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        let response = TransportResponse::new(status, body);

        if !response.is_success() {
            return Err(AuthError::Rejected {
                status,
                message: response.detail().unwrap_or_else(|| format!("HTTP {status}")),
            });
        }

        serde_json::from_str::<AuthSession>(&response.body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}
