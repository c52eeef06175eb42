use async_trait::async_trait;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{ Path, PathBuf };
use tokio::fs;

use crate::history::HistoryStore;
use crate::models::chat::ChatMessage;

pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> Result<Vec<ChatMessage>, Box<dyn Error + Send + Sync>> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => {
                let messages = serde_json
                    ::from_str(&text)
                    .map_err(|e| format!("Failed to parse history file '{}': {}", self.path.display(), e))?;
                Ok(messages)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Box::new(e)),
        }
    }

    async fn save(&self, messages: &[ChatMessage]) -> Result<(), Box<dyn Error + Send + Sync>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string(messages)?;
        // Write-then-rename so a crash never leaves half a history behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Box::new(e)),
        }
    }
}
