pub mod gemini;
pub mod chat_completion;

use async_trait::async_trait;
use log::error;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use super::{ LlmConfig, LlmType };
use self::gemini::GeminiChatClient;
use self::chat_completion::ChatCompletionClient;
use crate::config::prompt::Prompt;
use crate::error::ChatError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub response: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// One outbound call, one extracted text. No retries.
    async fn complete(&self, prompt: &Prompt) -> Result<CompletionResponse, ChatError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, ChatError> {
    let client: Arc<dyn ChatClient> = match config.llm_type {
        LlmType::Gemini => {
            let specific_client = GeminiChatClient::from_config(config)?;
            Arc::new(specific_client)
        }
        LlmType::Llama | LlmType::OpenAI | LlmType::Groq => {
            let specific_client = ChatCompletionClient::from_config(config)?;
            Arc::new(specific_client)
        }
    };
    Ok(client)
}

pub(crate) fn require_api_key(config: &LlmConfig) -> Result<String, ChatError> {
    config.api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ChatError::NotConfigured(config.llm_type.display_name().to_string()))
}

/// Parses a base URL and drops any trailing slash so routes can be appended.
pub(crate) fn parse_base_url(raw: &str) -> Result<String, ChatError> {
    let parsed = Url::parse(raw).map_err(|e|
        ChatError::InvalidConfig(format!("base URL '{}': {}", raw, e))
    )?;
    if parsed.cannot_be_a_base() {
        return Err(ChatError::InvalidConfig(format!("base URL '{}' cannot be a base", raw)));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => {
            let error = json.get("error");
            error
                .and_then(|e| e.get("message"))
                .or(error)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string())
        }
        Err(_) => body.to_string(),
    }
}

/// Sends the prepared request and returns the parsed JSON body of a 2xx reply.
pub(crate) async fn send_json(provider: LlmType, request: RequestBuilder) -> Result<Value, ChatError> {
    let resp = request.send().await.map_err(|e| {
        error!("{} request error: {}", provider, e);
        ChatError::Transport(e)
    })?;

    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = upstream_message(&body);
        error!("{} API error {}: {}", provider, status, message);
        return Err(ChatError::Upstream { status: status.as_u16(), message });
    }

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_key_is_not_configured() {
        let mut config = LlmConfig::default();
        assert!(matches!(new_client(&config), Err(ChatError::NotConfigured(p)) if p == "Gemini"));

        config.api_key = Some("   ".into());
        assert!(matches!(new_client(&config), Err(ChatError::NotConfigured(_))));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = LlmConfig {
            llm_type: LlmType::Llama,
            api_key: Some("key".into()),
            base_url: Some("not a url".into()),
            ..LlmConfig::default()
        };
        assert!(matches!(new_client(&config), Err(ChatError::InvalidConfig(_))));
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        assert_eq!(parse_base_url("https://api.example.com/v1/").unwrap(), "https://api.example.com/v1");
    }

    #[test]
    fn upstream_message_prefers_error_message() {
        assert_eq!(upstream_message(r#"{"error":{"code":403,"message":"denied"}}"#), "denied");
        assert_eq!(upstream_message(r#"{"error":"bad key"}"#), "bad key");
        assert_eq!(upstream_message("gateway timeout"), "gateway timeout");
    }
}
