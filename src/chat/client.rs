use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ChatError;
use crate::config::ApiConfig;

const FALLBACK_ERROR: &str = "Request failed";

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Successful answer from the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub meta: Option<Value>,
}

pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Build a client for the API rooted at `base_url`. Every request gives
    /// up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Client(e.to_string()))?;

        Ok(Self::with_http_client(base_url, http))
    }

    /// Use a preconfigured `reqwest` client (proxy settings, TLS roots, ...).
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ChatError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one message to the assistant and return its reply.
    pub async fn send(&self, message: &str, user_id: Option<&str>) -> Result<ChatReply, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let request = ChatRequest {
            message: message.to_string(),
            user_id: user_id.filter(|id| !id.is_empty()).map(str::to_string),
        };

        let url = format!("{}/chat", self.base_url);
        log::debug!("POST {}", url);

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::warn!("Assistant answered HTTP {}", status.as_u16());
            return Err(ChatError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_reply(status.as_u16(), &body)
    }

    /// Ask the API whether it is up. Returns the health payload.
    pub async fn health(&self) -> Result<Value, ChatError> {
        let url = format!("{}/health", self.base_url);
        log::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ChatError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ChatError::InvalidResponse(e.to_string()))
    }
}

/// A 2xx body carries either `{reply}` or `{error}`.
fn parse_reply(status: u16, body: &str) -> Result<ChatReply, ChatError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

    if value.get("reply").is_some_and(Value::is_string) {
        return serde_json::from_value(value).map_err(|e| ChatError::InvalidResponse(e.to_string()));
    }

    match value.get("error").and_then(Value::as_str) {
        Some(message) => Err(ChatError::Server {
            status,
            message: message.to_string(),
        }),
        None => Err(ChatError::InvalidResponse("missing 'reply' field".to_string())),
    }
}

/// Pull a human-readable message out of an error body: the JSON `error`
/// field, then `detail`, then the raw text.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail"] {
            match value.get(key) {
                Some(Value::String(message)) if !message.is_empty() => return message.clone(),
                Some(Value::Null) | None => {}
                Some(other) if !other.is_string() => return other.to_string(),
                Some(_) => {}
            }
        }
        return FALLBACK_ERROR.to_string();
    }

    let text = body.trim();
    if text.is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_user_id() {
        let request = ChatRequest {
            message: "hi".into(),
            user_id: None,
        };
        assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"message":"hi"}"#);
    }

    #[test]
    fn test_error_message_prefers_error_then_detail() {
        assert_eq!(error_message(r#"{"error":"LLM offline","detail":"x"}"#), "LLM offline");
        assert_eq!(error_message(r#"{"detail":"Not Found"}"#), "Not Found");
    }

    #[test]
    fn test_error_message_structured_detail() {
        let message = error_message(r#"{"detail":[{"msg":"field required"}]}"#);
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message("Internal Server Error"), "Internal Server Error");
        assert_eq!(error_message(""), "Request failed");
        assert_eq!(error_message("{}"), "Request failed");
    }

    #[test]
    fn test_parse_reply() {
        let reply = parse_reply(200, r#"{"reply":"You spent $85.50 on food","meta":{"model":"x"}}"#).unwrap();
        assert_eq!(reply.reply, "You spent $85.50 on food");
        assert!(reply.meta.is_some());
    }

    #[test]
    fn test_parse_reply_with_error_body() {
        assert_eq!(
            parse_reply(200, r#"{"error":"quota exceeded"}"#),
            Err(ChatError::Server {
                status: 200,
                message: "quota exceeded".into()
            })
        );
        assert!(matches!(parse_reply(200, "not json"), Err(ChatError::InvalidResponse(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ChatClient::new("http://127.0.0.1:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }
}
