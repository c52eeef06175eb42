use serde::{ Deserialize, Serialize };
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use log::info;

pub const DEFAULT_INSTRUCTIONS: &str =
    "You are an AI financial assistant. Provide advice on investments while:
1. Explaining concepts clearly and simply
2. Focusing on long-term investment strategies
3. Emphasizing diversification
4. Warning about risks
5. Reminding that this is general advice, not professional financial advice";

pub const DEFAULT_QUESTION_LABEL: &str = "User Question: ";

#[derive(Debug)]
pub enum PromptError {
    InvalidTemplate(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::InvalidTemplate(msg) => write!(f, "Invalid prompt template: {}", msg),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
            PromptError::JsonError(e) => write!(f, "Prompt JSON parsing error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            PromptError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

impl From<serde_json::Error> for PromptError {
    fn from(err: serde_json::Error) -> Self {
        PromptError::JsonError(err)
    }
}

fn default_question_label() -> String {
    DEFAULT_QUESTION_LABEL.to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct PromptConfig {
    pub instructions: String,
    #[serde(default = "default_question_label")]
    pub question_label: String,
    #[serde(skip)]
    pub last_loaded: Option<SystemTime>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            question_label: default_question_label(),
            last_loaded: None,
        }
    }
}

impl PromptConfig {
    fn validate(&self) -> Result<(), PromptError> {
        if self.instructions.trim().is_empty() {
            return Err(PromptError::InvalidTemplate("instructions must not be empty".to_string()));
        }
        Ok(())
    }

    /// Everything that precedes the user's text in the single-string form.
    pub fn preamble(&self) -> String {
        format!("{}\n\n{}", self.instructions, self.question_label)
    }
}

pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Arc<PromptConfig>, PromptError> {
    let file_content = fs::read_to_string(path.as_ref())?;
    let mut config: PromptConfig = serde_json::from_str(&file_content)?;
    config.validate()?;
    config.last_loaded = Some(SystemTime::now());
    info!("Loaded prompts from {}", path.as_ref().display());
    Ok(Arc::new(config))
}

pub fn reload_prompts_if_changed<P: AsRef<Path>>(
    path: P,
    current_config: &Arc<PromptConfig>
) -> Result<Option<Arc<PromptConfig>>, PromptError> {
    let metadata = fs::metadata(&path)?;

    if let Ok(modified) = metadata.modified() {
        match current_config.last_loaded {
            Some(last_loaded) if modified <= last_loaded => {}
            Some(_) => {
                info!("Prompts file changed, reloading...");
                return load_prompts(path).map(Some);
            }
            None => {
                info!("No last_loaded timestamp, reloading prompts...");
                return load_prompts(path).map(Some);
            }
        }
    }
    Ok(None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

/// One user question bound to the fixed instructions. Built per request and
/// rendered in whichever shape the provider expects.
#[derive(Debug, Clone)]
pub struct Prompt {
    config: Arc<PromptConfig>,
    question: String,
}

impl Prompt {
    pub fn new(config: Arc<PromptConfig>, question: impl Into<String>) -> Self {
        Self { config, question: question.into() }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn instructions(&self) -> &str {
        &self.config.instructions
    }

    /// Preamble followed by the untouched question.
    pub fn concatenated(&self) -> String {
        let mut prompt = self.config.preamble();
        prompt.push_str(&self.question);
        prompt
    }

    /// System entry with the instructions, user entry with the raw question.
    pub fn messages(&self) -> Vec<PromptMessage> {
        vec![
            PromptMessage {
                role: PromptRole::System,
                content: self.config.instructions.clone(),
            },
            PromptMessage {
                role: PromptRole::User,
                content: self.question.clone(),
            }
        ]
    }
}
