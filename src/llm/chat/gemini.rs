use async_trait::async_trait;
use log::info;
use reqwest::{ Client as HttpClient, header::CONTENT_TYPE };
use serde::Serialize;

use super::{ ChatClient, CompletionResponse, parse_base_url, require_api_key, send_json };
use crate::config::prompt::Prompt;
use crate::error::ChatError;
use crate::llm::normalize::{ extract_text, PathSegment };
use crate::llm::{ GenerationParams, LlmConfig, LlmType };

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const TEXT_PATH: &[PathSegment] = &[
    PathSegment::Key("candidates"),
    PathSegment::Index(0),
    PathSegment::Key("content"),
    PathSegment::Key("parts"),
    PathSegment::Index(0),
    PathSegment::Key("text"),
];

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GeminiGenerationConfig {
    fn from_params(params: &GenerationParams) -> Option<Self> {
        if params.temperature.is_none() && params.max_tokens.is_none() {
            return None;
        }
        Some(Self {
            temperature: params.temperature,
            max_output_tokens: params.max_tokens,
        })
    }
}

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
    generation: GenerationParams,
}

impl GeminiChatClient {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
        generation: GenerationParams
    ) -> Result<Self, ChatError> {
        let chat_model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        Ok(Self {
            http: HttpClient::new(),
            api_key,
            model: chat_model,
            base_url,
            generation,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = require_api_key(config)?;
        Self::new(api_key, config.model.clone(), config.base_url.clone(), config.generation.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(&self, prompt: &Prompt) -> Result<CompletionResponse, ChatError> {
        info!("GeminiChatClient::complete() → model={} base_url={}", self.model, self.base_url);

        let payload = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt.concatenated() }],
            }],
            generation_config: GeminiGenerationConfig::from_params(&self.generation),
        };

        let request = self.http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .json(&payload);

        let body = send_json(LlmType::Gemini, request).await?;
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
    use serde_json::json;

    #[test]
    fn defaults_apply_when_unset() {
        let client = GeminiChatClient::new("k".into(), None, None, GenerationParams::default()).unwrap();
        assert_eq!(client.get_model(), DEFAULT_MODEL);
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn generation_config_is_omitted_unless_configured() {
        let bare = GeminiRequest {
            contents: vec![],
            generation_config: GeminiGenerationConfig::from_params(&GenerationParams::default()),
        };
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"contents": []}));

        let tuned = GeminiRequest {
            contents: vec![],
            generation_config: GeminiGenerationConfig::from_params(&GenerationParams {
                temperature: Some(0.5),
                max_tokens: Some(2048),
                ..GenerationParams::default()
            }),
        };
        assert_eq!(
            serde_json::to_value(&tuned).unwrap(),
            json!({"contents": [], "generationConfig": {"temperature": 0.5, "maxOutputTokens": 2048}})
        );
    }
}
