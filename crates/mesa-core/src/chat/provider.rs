//! Collaborator traits the chat surface depends on.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition). The surface
//! is generic over these traits; implementations live in `mesa-infra`
//! (HTTP transport, token providers) and the CLI (terminal context).

use std::future::Future;
use std::sync::{Arc, RwLock};

use mesa_types::chat::ChatContext;
use mesa_types::error::ChatError;
use mesa_types::wire::{ChatRequest, TransportResponse};

/// Supplies the restaurant the surface is currently scoped to.
pub trait ContextProvider: Send + Sync {
    fn context(&self) -> ChatContext;
}

/// Supplies bearer tokens for chat requests.
pub trait AuthTokenProvider: Send + Sync {
    /// Current token, or `None` when the user is signed out.
    fn token(&self) -> impl Future<Output = Result<Option<String>, ChatError>> + Send;

    /// Called once after a 401. Return a refreshed token to retry the
    /// request with it, or `None` to give up. The default never refreshes.
    fn on_unauthorized(&self) -> impl Future<Output = Result<Option<String>, ChatError>> + Send {
        async { Ok(None) }
    }
}

/// Sends one chat request and returns the raw response.
///
/// Only network-level failures are errors; every HTTP status, including
/// 401 and 5xx, comes back as a `TransportResponse`.
pub trait ChatTransport: Send + Sync {
    fn post_chat(
        &self,
        path: &str,
        token: Option<&str>,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<TransportResponse, ChatError>> + Send;
}

impl<T: ContextProvider + ?Sized> ContextProvider for Arc<T> {
    fn context(&self) -> ChatContext {
        (**self).context()
    }
}

impl<T: AuthTokenProvider + ?Sized> AuthTokenProvider for Arc<T> {
    fn token(&self) -> impl Future<Output = Result<Option<String>, ChatError>> + Send {
        (**self).token()
    }

    fn on_unauthorized(&self) -> impl Future<Output = Result<Option<String>, ChatError>> + Send {
        (**self).on_unauthorized()
    }
}

impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    fn post_chat(
        &self,
        path: &str,
        token: Option<&str>,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<TransportResponse, ChatError>> + Send {
        (**self).post_chat(path, token, request)
    }
}

/// A context that can be swapped at runtime and read by the surface.
///
/// Clones share the same underlying context.
#[derive(Debug, Clone, Default)]
pub struct SharedContext {
    inner: Arc<RwLock<ChatContext>>,
}

impl SharedContext {
    pub fn new(context: ChatContext) -> Self {
        Self {
            inner: Arc::new(RwLock::new(context)),
        }
    }

    pub fn set(&self, context: ChatContext) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = context;
    }
}

impl ContextProvider for SharedContext {
    fn context(&self) -> ChatContext {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Token provider for deployments without authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl AuthTokenProvider for NoAuth {
    async fn token(&self) -> Result<Option<String>, ChatError> {
        Ok(None)
    }
}
