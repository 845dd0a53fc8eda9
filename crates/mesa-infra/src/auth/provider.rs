//! [`AuthTokenProvider`] implementations.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use mesa_core::chat::provider::AuthTokenProvider;
use mesa_types::auth::AuthSession;
use mesa_types::error::ChatError;

use super::{AuthClient, AuthError};

/// Refresh this many seconds before the access token actually expires.
const REFRESH_LEEWAY_SECS: i64 = 30;

/// A fixed bearer token. Blank tokens count as signed out.
pub struct StaticTokenProvider {
    token: Option<SecretString>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn expose(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose_secret())
    }
}

impl AuthTokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<Option<String>, ChatError> {
        Ok(self.expose().map(str::to_string))
    }
}

struct StoredSession {
    session: AuthSession,
    issued_at: DateTime<Utc>,
}

/// Login session with automatic refresh.
///
/// `token()` refreshes ahead of expiry. `on_unauthorized()` always refreshes.
/// A failed refresh signs the user out.
pub struct SessionTokenProvider {
    client: AuthClient,
    session: Mutex<Option<StoredSession>>,
}

impl SessionTokenProvider {
    pub fn new(client: AuthClient) -> Self {
        Self {
            client,
            session: Mutex::new(None),
        }
    }

    /// Start from an existing session, treated as issued now.
    pub fn with_session(client: AuthClient, session: AuthSession) -> Self {
        Self {
            client,
            session: Mutex::new(Some(StoredSession {
                session,
                issued_at: Utc::now(),
            })),
        }
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), AuthError> {
        let session = self.client.login(email, password).await?;
        *self.session.lock().await = Some(StoredSession {
            session,
            issued_at: Utc::now(),
        });
        Ok(())
    }

    /// Current access token without refreshing.
    pub async fn access_token(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|stored| stored.session.access_token.clone())
    }

    async fn refresh(&self, slot: &mut Option<StoredSession>) -> Result<Option<String>, AuthError> {
        let refresh_token = match slot.as_ref() {
            Some(stored) => stored.session.refresh_token.clone(),
            None => return Err(AuthError::NoSession),
        };

        match self.client.refresh(&refresh_token).await {
            Ok(session) => {
                let token = session.access_token.clone();
                *slot = Some(StoredSession {
                    session,
                    issued_at: Utc::now(),
                });
                Ok(Some(token))
            }
            Err(err) => {
                *slot = None;
                Err(err)
            }
        }
    }
}

impl AuthTokenProvider for SessionTokenProvider {
    async fn token(&self) -> Result<Option<String>, ChatError> {
        let mut slot = self.session.lock().await;
        let Some(stored) = slot.as_ref() else {
            return Ok(None);
        };

        if !stored
            .session
            .is_expired(stored.issued_at, Utc::now(), REFRESH_LEEWAY_SECS)
        {
            return Ok(Some(stored.session.access_token.clone()));
        }

        debug!("Access token expired, refreshing");
        match self.refresh(&mut slot).await {
            Ok(token) => Ok(token),
            Err(err) => {
                warn!(error = %err, "Session refresh failed, signing out");
                Ok(None)
            }
        }
    }

    async fn on_unauthorized(&self) -> Result<Option<String>, ChatError> {
        let mut slot = self.session.lock().await;
        if slot.is_none() {
            return Ok(None);
        }
        debug!("Chat endpoint returned 401, refreshing session");
        Ok(self.refresh(&mut slot).await?)
    }
}
