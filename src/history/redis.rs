use async_trait::async_trait;
use crate::models::chat::ChatMessage;
use crate::history::HistoryStore;
use std::error::Error;
use log::debug;
use redis::{ Client, AsyncCommands };

/// Stores the whole sequence as one JSON string value.
pub struct RedisHistoryStore {
    client: Client,
    key: String,
}

impl RedisHistoryStore {
    pub fn new(host: &str, prefix: &str, key: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(Self {
            client: Client::open(host)?,
            key: format!("{}{}", prefix, key),
        })
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, redis::RedisError> {
        self.client.get_multiplexed_async_connection().await
    }
}

#[async_trait]
impl HistoryStore for RedisHistoryStore {
    async fn load(&self) -> Result<Vec<ChatMessage>, Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let stored: Option<String> = conn.get(&self.key).await?;
        match stored {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => {
                debug!("No history stored under {}", self.key);
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, messages: &[ChatMessage]) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let json = serde_json::to_string(messages)?;
        let _: () = conn.set(&self.key, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut conn = self.get_connection().await?;
        let _: i64 = conn.del(&self.key).await?;
        Ok(())
    }
}
