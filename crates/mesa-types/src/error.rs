use thiserror::Error;

/// Errors raised while a send is in flight.
///
/// None of these escape `ChatSurface::send`; they are mapped to a status
/// message and reported through `SendOutcome::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("authentication required")]
    AuthRequired,

    /// Non-2xx final response. `message` is the server detail when present.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("auth provider error: {0}")]
    Auth(String),
}

impl ChatError {
    /// Build an HTTP error, preferring the server-provided detail.
    pub fn http(status: u16, detail: Option<String>) -> Self {
        ChatError::Http {
            status,
            message: detail.unwrap_or_else(|| format!("HTTP {status}")),
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, ChatError::AuthRequired)
    }
}

/// Why a send was refused before any side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Another send is still in flight.
    Busy,
    /// The bound context has no restaurant id.
    NoContext,
    /// Message was empty after trimming.
    EmptyMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_uses_detail() {
        let err = ChatError::http(404, Some("Restaurant introuvable".to_string()));
        assert_eq!(err.to_string(), "Restaurant introuvable");
    }

    #[test]
    fn test_http_error_generic_message() {
        let err = ChatError::http(502, None);
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn test_auth_required_identity() {
        assert!(ChatError::AuthRequired.is_auth_required());
        assert!(!ChatError::Transport("reset".to_string()).is_auth_required());
    }
}
