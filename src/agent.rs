use crate::cli::Args;
use crate::config::prompt::{ self, Prompt, PromptConfig, PromptError };
use crate::error::ChatError;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::llm::normalize::clean_response;
use crate::llm::{ GenerationParams, LlmConfig, LlmType };

use log::{ info, warn, error };
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Runs one question through prompt assembly, the configured provider and
/// the response normalizer.
pub struct FinanceAgent {
    chat_client: Option<Arc<dyn ChatClient>>,
    llm_type: LlmType,
    prompt_config: RwLock<Arc<PromptConfig>>,
    clean_responses: bool,
}

impl FinanceAgent {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let chat_config = Self::chat_config(args)?;
        let chat_client = match new_chat_client(&chat_config) {
            Ok(client) => {
                info!(
                    "Chat client configured: Type={}, Model={}, BaseURL={}",
                    chat_config.llm_type,
                    client.get_model(),
                    client.get_base_url()
                );
                Some(client)
            }
            Err(ChatError::NotConfigured(provider)) => {
                warn!("{} API key not configured. Chat requests will be refused.", provider);
                None
            }
            Err(e) => {
                return Err(Box::new(e));
            }
        };

        let prompt_config = match &args.prompts_path {
            Some(path) =>
                prompt::load_prompts(path).map_err(|e|
                    format!("Failed to load prompts file '{}': {}", path, e)
                )?,
            None => Arc::new(PromptConfig::default()),
        };

        Ok(Self::with_client(chat_client, chat_config.llm_type, prompt_config, args.clean_response))
    }

    pub fn with_client(
        chat_client: Option<Arc<dyn ChatClient>>,
        llm_type: LlmType,
        prompt_config: Arc<PromptConfig>,
        clean_responses: bool
    ) -> Self {
        Self {
            chat_client,
            llm_type,
            prompt_config: RwLock::new(prompt_config),
            clean_responses,
        }
    }

    fn chat_config(args: &Args) -> Result<LlmConfig, Box<dyn Error + Send + Sync>> {
        let llm_type: LlmType = args.chat_llm_type.parse()?;
        Ok(LlmConfig {
            llm_type,
            api_key: args.resolved_api_key(llm_type),
            model: args.chat_model.clone(),
            base_url: args.chat_base_url.clone(),
            generation: GenerationParams {
                temperature: args.temperature,
                max_tokens: args.max_tokens,
                top_p: args.top_p,
                frequency_penalty: args.frequency_penalty,
                presence_penalty: args.presence_penalty,
            },
        })
    }

    pub fn is_configured(&self) -> bool {
        self.chat_client.is_some()
    }

    pub async fn prompt_config(&self) -> Arc<PromptConfig> {
        Arc::clone(&*self.prompt_config.read().await)
    }

    /// Answers one question. Configuration is checked first, then the input,
    /// so neither failure ever reaches the network.
    pub async fn answer(&self, question: &str) -> Result<String, ChatError> {
        let client = self.chat_client
            .as_ref()
            .ok_or_else(|| ChatError::NotConfigured(self.llm_type.display_name().to_string()))?;

        if question.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        let prompt = Prompt::new(self.prompt_config().await, question);
        let completion = client.complete(&prompt).await.map_err(|e| {
            error!("LLM interaction error: {}", e);
            e
        })?;

        if self.clean_responses {
            Ok(clean_response(&completion.response))
        } else {
            Ok(completion.response)
        }
    }

    /// Swaps in the prompt file at `path` when it changed since the last load.
    pub async fn reload_prompts_if_changed<P: AsRef<Path>>(&self, path: P) -> Result<bool, PromptError> {
        let mut current = self.prompt_config.write().await;
        match prompt::reload_prompts_if_changed(path, &current)? {
            Some(new_config) => {
                *current = new_config;
                info!("Prompts successfully reloaded");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
