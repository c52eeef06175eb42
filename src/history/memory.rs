use async_trait::async_trait;
use std::error::Error;
use tokio::sync::Mutex;

use crate::history::HistoryStore;
use crate::models::chat::ChatMessage;

/// Keeps the encoded sequence in process memory; nothing survives a restart.
#[derive(Default)]
pub struct MemoryHistoryStore {
    slot: Mutex<Option<String>>,
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> Result<Vec<ChatMessage>, Box<dyn Error + Send + Sync>> {
        match self.slot.lock().await.as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, messages: &[ChatMessage]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let json = serde_json::to_string(messages)?;
        *self.slot.lock().await = Some(json);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.slot.lock().await.take();
        Ok(())
    }
}
