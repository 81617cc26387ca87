use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ChatMessage, ChatRequest, ChatResponse};

const DEFAULT_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5";
/// Local generation is slow on modest hardware; leave generous headroom.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("Ollama API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("model returned no message")]
    NoMessage,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Output mode requested from the model. `Json` constrains the reply to
/// syntactically valid JSON via Ollama's structured-output switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// Abstraction for chat completion against a system prompt.
/// Implemented by `OllamaClient` for production; mock implementations used in tests.
pub trait ChatClient {
    async fn chat(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, OllamaError>;
}

#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn from_env(http: Client) -> Self {
        let base_url = env::var("OLLAMA_URL")
            .ok()
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let model = env::var("OLLAMA_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            http,
            base_url,
            model,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ChatClient for OllamaClient {
    async fn chat(
        &self,
        system: &str,
        user: &str,
        format: ResponseFormat,
    ) -> Result<String, OllamaError> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            stream: false,
            format: match format {
                ResponseFormat::Json => Some("json"),
                ResponseFormat::Text => None,
            },
        };

        let response = self
            .http
            .post(&url)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<ChatResponse>(&text)
                && let Some(message) = body.error
            {
                warn!(code = status.as_u16(), error = %message, "Ollama API error");
                return Err(OllamaError::Api {
                    code: status.as_u16(),
                    message,
                });
            }
            let snippet = if text.len() > 200 { &text[..200] } else { &text };
            warn!(status = %status, "Ollama API error (no structured body)");
            return Err(OllamaError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {snippet}"),
            });
        }

        let body: ChatResponse = response.json().await?;
        if let Some(message) = body.error {
            warn!(error = %message, "Ollama error in 200 response");
            return Err(OllamaError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let content = body
            .message
            .map(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or(OllamaError::NoMessage)?;

        debug!(model = %self.model, chars = content.len(), "chat completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "model": "qwen2.5",
            "message": { "role": "assistant", "content": content },
            "done": true
        })
    }

    #[tokio::test]
    async fn chat_success_returns_message_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({ "stream": false })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("Bonjour !")))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(Client::new(), &server.uri());
        let reply = client
            .chat("system prompt", "user question", ResponseFormat::Text)
            .await
            .unwrap();

        assert_eq!(reply, "Bonjour !");
    }

    #[tokio::test]
    async fn json_mode_sets_format_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({ "format": "json" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("{}")))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(Client::new(), &server.uri());
        let reply = client
            .chat("system", "user", ResponseFormat::Json)
            .await
            .unwrap();

        assert_eq!(reply, "{}");
    }

    #[tokio::test]
    async fn text_mode_omits_format_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(Client::new(), &server.uri());
        client
            .chat("system", "user", ResponseFormat::Text)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert!(body.get("format").is_none());
    }

    #[tokio::test]
    async fn error_body_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "model 'qwen2.5' not found"
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(Client::new(), &server.uri());
        let err = client
            .chat("system", "user", ResponseFormat::Text)
            .await
            .unwrap_err();

        match err {
            OllamaError::Api { code: 404, message } => {
                assert!(message.contains("not found"));
            }
            other => panic!("expected Api(404), got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_without_structured_body_keeps_snippet() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(Client::new(), &server.uri());
        let err = client
            .chat("system", "user", ResponseFormat::Text)
            .await
            .unwrap_err();

        match err {
            OllamaError::Api { code: 500, message } => {
                assert!(message.contains("not json"), "got: {message}");
            }
            other => panic!("expected Api(500), got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_message_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "qwen2.5",
                "done": true
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::with_base_url(Client::new(), &server.uri());
        let err = client
            .chat("system", "user", ResponseFormat::Text)
            .await
            .unwrap_err();

        assert!(matches!(err, OllamaError::NoMessage));
    }
}
