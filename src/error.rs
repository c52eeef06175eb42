use thiserror::Error;

/// Everything that can end a chat turn. None of these are retried; the caller
/// has to resubmit.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0} API key not configured")]
    NotConfigured(String),

    #[error("Prompt is required")]
    EmptyPrompt,

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("Provider returned HTTP {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
    },

    #[error("Request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider response is missing field '{0}'")]
    MissingField(String),

    #[error("Provider response is not valid JSON: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ChatError {
    /// Text shown to end users. Upstream details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::NotConfigured(_) => "API key not configured",
            ChatError::EmptyPrompt => "Prompt is required",
            ChatError::MissingField(_) | ChatError::MalformedBody(_) => "Invalid response format",
            ChatError::InvalidConfig(_) | ChatError::Upstream { .. } | ChatError::Transport(_) =>
                "Failed to generate response",
        }
    }
}
