pub mod interactive;

use clap::{ ArgAction, Parser };
use std::env;
use crate::llm::LlmType;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (gemini, llama, openai, groq)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "gemini")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API (e.g., https://generativelanguage.googleapis.com/v1beta)
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let adapters handle defaults if None
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider. For Gemini, GEMINI_API_KEY or GOOGLE_API_KEY are used when empty.
    #[arg(long, env = "CHAT_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gemini-2.0-flash, llama3.1-70b, gpt-4o-mini)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on adapter defaults if None
    pub chat_model: Option<String>,

    /// Sampling temperature sent to the provider.
    #[arg(long, env = "CHAT_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Maximum number of tokens the provider may generate.
    #[arg(long, env = "CHAT_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Nucleus sampling cut-off (chat-completion providers only).
    #[arg(long, env = "CHAT_TOP_P")]
    pub top_p: Option<f32>,

    /// Frequency penalty (chat-completion providers only).
    #[arg(long, env = "CHAT_FREQUENCY_PENALTY")]
    pub frequency_penalty: Option<f32>,

    /// Presence penalty (chat-completion providers only).
    #[arg(long, env = "CHAT_PRESENCE_PENALTY")]
    pub presence_penalty: Option<f32>,

    /// Strip markdown asterisks and tidy bullets/blank lines in replies.
    #[arg(long, env = "CLEAN_RESPONSE", default_value_t = true, action = ArgAction::Set)]
    pub clean_response: bool,

    /// Optional JSON file overriding the built-in assistant instructions.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Interactive Session Args ---
    /// Chat in the terminal instead of serving HTTP.
    #[arg(short, long, env = "INTERACTIVE", default_value = "false")]
    pub interactive: bool,

    /// History store for interactive sessions (file, redis, memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "file")]
    pub history_type: String,

    /// Directory holding file-backed history.
    #[arg(long, env = "HISTORY_DIR", default_value = ".finchat")]
    pub history_dir: String,

    /// History chat store host endpoint (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "HISTORY_HOST", default_value = "redis://127.0.0.1:6379")]
    pub history_host: String,

    /// Key the message sequence is stored under.
    #[arg(long, env = "HISTORY_KEY", default_value = "chatMessages")]
    pub history_key: String,

    /// Prefix for Redis history keys.
    #[arg(long, env = "HISTORY_REDIS_PREFIX", default_value = "history:")]
    pub history_redis_prefix: String,
}

const GEMINI_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

impl Args {
    /// The configured key, or for Gemini the `GEMINI_API_KEY`/`GOOGLE_API_KEY`
    /// variables.
    pub fn resolved_api_key(&self, llm_type: LlmType) -> Option<String> {
        pick_api_key(&self.chat_api_key, llm_type, |name| env::var(name).ok())
    }
}

/// First non-blank of the explicit key and, for Gemini only, the fallback
/// variables in order. `lookup` reads a variable by name.
fn pick_api_key<F>(explicit: &str, llm_type: LlmType, lookup: F) -> Option<String>
    where F: Fn(&str) -> Option<String>
{
    let explicit = explicit.trim();
    if !explicit.is_empty() {
        return Some(explicit.to_string());
    }
    if llm_type != LlmType::Gemini {
        return None;
    }
    GEMINI_KEY_VARS.iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
