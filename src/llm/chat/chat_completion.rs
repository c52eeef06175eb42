use async_trait::async_trait;
use log::info;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::Serialize;

use super::{ ChatClient, CompletionResponse, parse_base_url, require_api_key, send_json };
use crate::config::prompt::{ Prompt, PromptMessage };
use crate::error::ChatError;
use crate::llm::normalize::{ extract_text, PathSegment };
use crate::llm::{ GenerationParams, LlmConfig, LlmType };

const TEXT_PATH: &[PathSegment] = &[
    PathSegment::Key("choices"),
    PathSegment::Index(0),
    PathSegment::Key("message"),
    PathSegment::Key("content"),
];

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TOP_P: f32 = 1.0;
const DEFAULT_FREQUENCY_PENALTY: f32 = 0.0;
const DEFAULT_PRESENCE_PENALTY: f32 = 0.0;

/// Base URL and model used when nothing is configured.
pub fn provider_defaults(llm_type: LlmType) -> (&'static str, &'static str) {
    match llm_type {
        LlmType::OpenAI => ("https://api.openai.com/v1", "gpt-4o-mini"),
        LlmType::Groq => ("https://api.groq.com/openai/v1", "llama-3.1-8b-instant"),
        LlmType::Llama | LlmType::Gemini => ("https://api.llama-api.com", "llama3.1-70b"),
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<PromptMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

/// OpenAI-compatible `/chat/completions` client, shared by the hosted Llama,
/// OpenAI and Groq endpoints.
pub struct ChatCompletionClient {
    http: HttpClient,
    llm_type: LlmType,
    model: String,
    base_url: String,
    generation: GenerationParams,
}

impl ChatCompletionClient {
    pub fn new(
        llm_type: LlmType,
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        generation: GenerationParams
    ) -> Result<Self, ChatError> {
        let (default_url, default_model) = provider_defaults(llm_type);
        let chat_model = model.unwrap_or_else(|| default_model.to_string());
        let api_url = parse_base_url(base_url.as_deref().unwrap_or(default_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e|
            ChatError::InvalidConfig(format!("Invalid API key format: {}", e))
        )?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            llm_type,
            model: chat_model,
            base_url: api_url,
            generation,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = require_api_key(config)?;
        Self::new(
            config.llm_type,
            api_key,
            config.model.clone(),
            config.base_url.clone(),
            config.generation.clone()
        )
    }

    fn request_body<'a>(&'a self, prompt: &Prompt) -> ChatCompletionRequest<'a> {
        let params = &self.generation;
        ChatCompletionRequest {
            model: &self.model,
            messages: prompt.messages(),
            temperature: params.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            top_p: params.top_p.unwrap_or(DEFAULT_TOP_P),
            frequency_penalty: params.frequency_penalty.unwrap_or(DEFAULT_FREQUENCY_PENALTY),
            presence_penalty: params.presence_penalty.unwrap_or(DEFAULT_PRESENCE_PENALTY),
        }
    }
}

#[async_trait]
impl ChatClient for ChatCompletionClient {
    async fn complete(&self, prompt: &Prompt) -> Result<CompletionResponse, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        info!("{} chat completion → model={} url={}", self.llm_type, self.model, url);

        let request = self.http.post(&url).json(&self.request_body(prompt));
        let body = send_json(self.llm_type, request).await?;
        let text = extract_text(&body, TEXT_PATH)?;
        Ok(CompletionResponse { response: text })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::prompt::PromptConfig;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn request_body_uses_defaults_and_system_message() {
        let client = ChatCompletionClient::new(
            LlmType::Llama,
            "key".into(),
            None,
            None,
            GenerationParams::default()
        ).unwrap();
        let config = Arc::new(PromptConfig {
            instructions: "Be careful.".into(),
            ..PromptConfig::default()
        });
        let prompt = Prompt::new(config, "Is gold a hedge?");

        let body = serde_json::to_value(client.request_body(&prompt)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "llama3.1-70b",
                "messages": [
                    {"role": "system", "content": "Be careful."},
                    {"role": "user", "content": "Is gold a hedge?"}
                ],
                "temperature": DEFAULT_TEMPERATURE,
                "max_tokens": 1024,
                "top_p": 1.0,
                "frequency_penalty": 0.0,
                "presence_penalty": 0.0
            })
        );
    }

    #[test]
    fn provider_defaults_differ_per_vendor() {
        let groq = ChatCompletionClient::new(
            LlmType::Groq,
            "key".into(),
            None,
            None,
            GenerationParams::default()
        ).unwrap();
        assert_eq!(groq.get_base_url(), "https://api.groq.com/openai/v1");
        assert_eq!(groq.get_model(), "llama-3.1-8b-instant");
    }
}
