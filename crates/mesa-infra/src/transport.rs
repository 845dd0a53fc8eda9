//! HttpChatTransport -- concrete [`ChatTransport`] over reqwest.
//!
//! Posts the chat request as JSON to `{base_url}{path}` and hands back the
//! raw status and body. Status interpretation (401 retry, `detail`
//! extraction) is left to the caller.

use std::time::Duration;

use tracing::debug;

use mesa_core::chat::provider::ChatTransport;
use mesa_types::config::ClientConfig;
use mesa_types::error::ChatError;
use mesa_types::wire::{ChatRequest, TransportResponse};

pub struct HttpChatTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute paths are used as-is; anything else is joined to the base URL.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl ChatTransport for HttpChatTransport {
    async fn post_chat(
        &self,
        path: &str,
        token: Option<&str>,
        request: &ChatRequest,
    ) -> Result<TransportResponse, ChatError> {
        let url = self.url(path);
        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(e.to_string()))?;

        debug!(%url, status, body_len = body.len(), "Chat transport response");
        Ok(TransportResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use mesa_types::chat::ConversationEntry;

    use super::*;

    fn request() -> ChatRequest {
        ChatRequest {
            restaurant_id: "r1".to_string(),
            message: "Menu?".to_string(),
            history: vec![
                ConversationEntry::user("Bonjour").unwrap(),
                ConversationEntry::assistant("Bonsoir!").unwrap(),
            ],
            session_id: "s-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_json_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(header("authorization", "Bearer tok"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "restaurant_id": "r1",
                "message": "Menu?",
                "history": [
                    {"role": "user", "content": "Bonjour"},
                    {"role": "assistant", "content": "Bonsoir!"}
                ],
                "session_id": "s-1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Voici le menu"})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpChatTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let response = transport.post_chat("/api/chat", Some("tok"), &request()).await.unwrap();
        assert!(response.is_success());
        assert!(response.body.contains("Voici le menu"));
    }

    #[tokio::test]
    async fn test_omits_authorization_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "ok"})))
            .mount(&server)
            .await;

        let transport = HttpChatTransport::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        transport.post_chat("api/chat", None, &request()).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Restaurant introuvable"})),
            )
            .mount(&server)
            .await;

        let transport = HttpChatTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let response = transport.post_chat("/api/chat", None, &request()).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.detail().as_deref(), Some("Restaurant introuvable"));
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_transport_error() {
        let transport = HttpChatTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = transport.post_chat("/api/chat", None, &request()).await.unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }
}
