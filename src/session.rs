use crate::agent::FinanceAgent;
use crate::history::HistoryStore;
use crate::models::chat::ChatMessage;
use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;

pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Client-side conversation: an ordered, append-only message list mirrored
/// into a [`HistoryStore`] after every change.
///
/// `submit` borrows the session mutably, so a session never has more than one
/// request in flight.
pub struct ChatSession {
    agent: Arc<FinanceAgent>,
    store: Arc<dyn HistoryStore>,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Opens a session with whatever the store holds, unchanged.
    pub async fn open(
        agent: Arc<FinanceAgent>,
        store: Arc<dyn HistoryStore>
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let messages = store.load().await?;
        info!("Restored {} message(s) from history", messages.len());
        Ok(Self { agent, store, messages })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Sends one user turn. Blank input is ignored and returns `Ok(None)`
    /// without contacting the provider. Provider failures become an apology
    /// message. A failed history write is logged and the turn carries on; the
    /// in-memory list stays authoritative and the next write sends all of it.
    pub async fn submit(
        &mut self,
        input: &str
    ) -> Result<Option<&ChatMessage>, Box<dyn Error + Send + Sync>> {
        let question = input.trim();
        if question.is_empty() {
            return Ok(None);
        }

        self.push(ChatMessage::user(question)).await;

        let reply = match self.agent.answer(question).await {
            Ok(text) => ChatMessage::assistant(text),
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                ChatMessage::assistant(APOLOGY)
            }
        };
        self.push(reply).await;

        Ok(self.messages.last())
    }

    /// Empties the conversation and drops the persisted copy.
    pub async fn clear(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.store.clear().await?;
        self.messages.clear();
        info!("Chat history cleared");
        Ok(())
    }

    async fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if let Err(e) = self.store.save(&self.messages).await {
            warn!("History write failed, keeping {} message(s) in memory: {}", self.messages.len(), e);
        }
    }
}
