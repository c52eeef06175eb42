use serde::{ Serialize, Deserialize };

/// Inbound body. The Gemini widget posts `prompt`, the SDK widget `message`.
#[derive(Deserialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(alias = "message")]
    pub prompt: Option<String>,
}

/// Both keys carry the same text so either widget variant can read it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ChatResponse {
    pub message: String,
    pub response: String,
}

impl ChatResponse {
    pub fn new(text: String) -> Self {
        Self { response: text.clone(), message: text }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReloadResponse {
    pub success: bool,
    pub message: String,
    pub details: Option<Vec<String>>,
}
