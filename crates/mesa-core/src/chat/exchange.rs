//! One chat request, with a single refresh-and-retry on 401.
//!
//! The protocol is explicit: resolve a token, attempt, inspect the status,
//! and on 401 ask the token provider for a refreshed token and retry once.
//! There is never a third attempt.

use tracing::{debug, warn};

use mesa_types::error::ChatError;
use mesa_types::wire::{ChatReply, ChatRequest, TransportResponse};

use super::provider::{AuthTokenProvider, ChatTransport};

/// Request parameters that do not change between attempts.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeOptions<'a> {
    pub request_path: &'a str,
    pub require_auth: bool,
    /// Substituted when the reply is missing or blank.
    pub reply_fallback: &'a str,
}

/// Send `request` and return the assistant reply text.
pub async fn exchange<A, T>(
    auth: &A,
    transport: &T,
    request: &ChatRequest,
    options: ExchangeOptions<'_>,
) -> Result<String, ChatError>
where
    A: AuthTokenProvider,
    T: ChatTransport,
{
    let token = if options.require_auth {
        let token = non_blank(auth.token().await?).ok_or(ChatError::AuthRequired)?;
        Some(token)
    } else {
        None
    };

    let mut response = transport
        .post_chat(options.request_path, token.as_deref(), request)
        .await?;
    debug!(status = response.status, attempt = 1, "Chat request completed");

    if response.is_unauthorized() && options.require_auth {
        match auth.on_unauthorized().await {
            Ok(refreshed) => {
                if let Some(refreshed) = non_blank(refreshed) {
                    response = transport
                        .post_chat(options.request_path, Some(&refreshed), request)
                        .await?;
                    debug!(status = response.status, attempt = 2, "Chat request retried after 401");
                }
            }
            Err(e) => {
                warn!(error = %e, "Token refresh after 401 failed");
            }
        }
    }

    interpret(response, options.reply_fallback)
}

fn interpret(response: TransportResponse, fallback: &str) -> Result<String, ChatError> {
    if !response.is_success() {
        return Err(ChatError::http(response.status, response.detail()));
    }

    let reply: ChatReply = serde_json::from_str(&response.body)
        .map_err(|e| ChatError::Decode(format!("invalid chat reply: {e}")))?;

    Ok(reply
        .reply
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string()))
}

fn non_blank(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.trim().is_empty())
}


#[cfg(test)]
mod tests {
    use super::testing::{FixedAuth, ScriptedTransport};
    use super::*;

    fn request() -> ChatRequest {
        ChatRequest {
            restaurant_id: "r1".to_string(),
            message: "Bonjour".to_string(),
            history: vec![],
            session_id: "s1".to_string(),
        }
    }

    fn options(require_auth: bool) -> ExchangeOptions<'static> {
        ExchangeOptions {
            request_path: "/api/chat",
            require_auth,
            reply_fallback: "Reply unavailable.",
        }
    }

    #[tokio::test]
    async fn test_success_sends_bearer_token() {
        let auth = FixedAuth::with_token("tok");
        let transport = ScriptedTransport::replies(&["Bonsoir!"]);
        let reply = exchange(&auth, &transport, &request(), options(true)).await.unwrap();
        assert_eq!(reply, "Bonsoir!");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/api/chat");
        assert_eq!(calls[0].1.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_auth_required_without_token_sends_nothing() {
        let auth = FixedAuth::default();
        let transport = ScriptedTransport::replies(&["unused"]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert_eq!(err, ChatError::AuthRequired);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_token_counts_as_missing() {
        let auth = FixedAuth::with_token("  ");
        let transport = ScriptedTransport::replies(&["unused"]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert!(err.is_auth_required());
    }

    #[tokio::test]
    async fn test_no_auth_omits_token() {
        let auth = FixedAuth::with_token("tok");
        let transport = ScriptedTransport::replies(&["ok"]);
        exchange(&auth, &transport, &request(), options(false)).await.unwrap();
        assert_eq!(transport.calls()[0].1, None);
    }

    #[tokio::test]
    async fn test_401_then_200_retries_once_with_refreshed_token() {
        let auth = FixedAuth::refreshing("stale", "fresh");
        let transport = ScriptedTransport::new(vec![
            Ok(TransportResponse::new(401, r#"{"detail":"Jeton expiré"}"#)),
            Ok(TransportResponse::new(200, r#"{"reply":"Bonsoir!"}"#)),
        ]);
        let reply = exchange(&auth, &transport, &request(), options(true)).await.unwrap();
        assert_eq!(reply, "Bonsoir!");
        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1.as_deref(), Some("stale"));
        assert_eq!(calls[1].1.as_deref(), Some("fresh"));
        assert_eq!(auth.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_401_twice_is_not_retried_again() {
        let auth = FixedAuth::refreshing("stale", "fresh");
        let transport = ScriptedTransport::new(vec![
            Ok(TransportResponse::new(401, "")),
            Ok(TransportResponse::new(401, r#"{"detail":"Authentification requise."}"#)),
            Ok(TransportResponse::new(200, r#"{"reply":"never"}"#)),
        ]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert_eq!(transport.call_count(), 2);
        assert_eq!(
            err,
            ChatError::Http {
                status: 401,
                message: "Authentification requise.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_401_without_refreshed_token_fails_once() {
        let auth = FixedAuth::with_token("stale");
        let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(401, ""))]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert_eq!(transport.call_count(), 1);
        assert_eq!(err.to_string(), "HTTP 401");
        assert_eq!(auth.refresh_calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_error_falls_through_to_http_failure() {
        let auth = FixedAuth::failing_refresh("stale");
        let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(401, ""))]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert_eq!(transport.call_count(), 1);
        assert_eq!(auth.refresh_calls(), 1);
        assert!(matches!(err, ChatError::Http { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_401_without_auth_requirement_is_plain_failure() {
        let auth = FixedAuth::refreshing("a", "b");
        let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(401, ""))]);
        exchange(&auth, &transport, &request(), options(false)).await.unwrap_err();
        assert_eq!(auth.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_server_detail_surfaces() {
        let auth = FixedAuth::with_token("tok");
        let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(
            422,
            r#"{"detail":"Menu non configuré pour ce restaurant."}"#,
        ))]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert_eq!(err.to_string(), "Menu non configuré pour ce restaurant.");
    }

    #[tokio::test]
    async fn test_blank_or_missing_reply_uses_fallback() {
        let auth = FixedAuth::with_token("tok");
        let transport = ScriptedTransport::new(vec![
            Ok(TransportResponse::new(200, r#"{"reply":"   "}"#)),
            Ok(TransportResponse::new(200, "{}")),
        ]);
        for _ in 0..2 {
            let reply = exchange(&auth, &transport, &request(), options(true)).await.unwrap();
            assert_eq!(reply, "Reply unavailable.");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let auth = FixedAuth::with_token("tok");
        let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(200, "<html>"))]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let auth = FixedAuth::with_token("tok");
        let transport =
            ScriptedTransport::new(vec![Err(ChatError::Transport("connection refused".to_string()))]);
        let err = exchange(&auth, &transport, &request(), options(true)).await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }
}
