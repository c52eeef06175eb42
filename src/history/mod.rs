mod file;
mod memory;
mod redis;

pub use self::file::FileHistoryStore;
pub use self::memory::MemoryHistoryStore;
pub use self::redis::RedisHistoryStore;

use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use crate::cli::Args;
use crate::models::chat::ChatMessage;

/// Persisted copy of one session's message sequence, stored JSON-encoded
/// under a single key.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Returns the stored sequence, or an empty one when nothing was saved.
    async fn load(&self) -> Result<Vec<ChatMessage>, Box<dyn Error + Send + Sync>>;

    /// Replaces the stored sequence.
    async fn save(&self, messages: &[ChatMessage]) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Removes the stored sequence entirely.
    async fn clear(&self) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub fn create_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "file" => {
            let store = FileHistoryStore::new(&args.history_dir, &args.history_key);
            Ok(Arc::new(store))
        }
        "redis" => {
            let store = RedisHistoryStore::new(
                &args.history_host,
                &args.history_redis_prefix,
                &args.history_key
            )?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryHistoryStore::default())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub fn initialize_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    let location = match args.history_type.to_lowercase().as_str() {
        "file" => args.history_dir.clone(),
        "redis" => args.history_host.clone(),
        _ => "process memory".to_string(),
    };
    info!("Chat history will be stored in: {} at {}", args.history_type, location);
    create_history_store(args)
}
