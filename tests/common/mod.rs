#![allow(dead_code)]

use async_trait::async_trait;
use finchat::agent::FinanceAgent;
use finchat::config::prompt::{ Prompt, PromptConfig };
use finchat::error::ChatError;
use finchat::llm::chat::{ ChatClient, CompletionResponse };
use finchat::llm::LlmType;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };

pub enum Behaviour {
    Reply(String),
    Fail(u16),
    MissingField,
}

/// Stands in for a provider: counts calls and remembers the last question.
pub struct MockChatClient {
    behaviour: Behaviour,
    calls: AtomicUsize,
    last_question: Mutex<Option<String>>,
}

impl MockChatClient {
    pub fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: AtomicUsize::new(0),
            last_question: Mutex::new(None),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(Behaviour::Reply(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_question(&self) -> Option<String> {
        self.last_question.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, prompt: &Prompt) -> Result<CompletionResponse, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_question.lock().unwrap() = Some(prompt.question().to_string());
        match &self.behaviour {
            Behaviour::Reply(text) => Ok(CompletionResponse { response: text.clone() }),
            Behaviour::Fail(status) => Err(ChatError::Upstream { status: *status, message: "boom".into() }),
            Behaviour::MissingField => Err(ChatError::MissingField("candidates".into())),
        }
    }

    fn get_model(&self) -> String {
        "mock-model".into()
    }

    fn get_base_url(&self) -> String {
        "http://mock.invalid".into()
    }
}

pub fn agent_with(client: &Arc<MockChatClient>, clean: bool) -> Arc<FinanceAgent> {
    let client: Arc<dyn ChatClient> = client.clone();
    Arc::new(FinanceAgent::with_client(Some(client), LlmType::Gemini, Arc::new(PromptConfig::default()), clean))
}

pub fn unconfigured_agent() -> Arc<FinanceAgent> {
    Arc::new(FinanceAgent::with_client(None, LlmType::Gemini, Arc::new(PromptConfig::default()), true))
}
