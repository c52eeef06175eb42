pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod llm;
pub mod cli;
pub mod history;
pub mod session;
pub mod error;

use agent::FinanceAgent;
use cli::Args;
use history::initialize_history_store;
use log::info;
use server::Server;
use session::ChatSession;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("adapter default"));
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or("adapter default"));
    info!("Clean Responses: {}", args.clean_response);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("Mode: {}", if args.interactive { "interactive" } else { "http" });
    if args.interactive {
        info!("History Store Type: {}", args.history_type);
        info!("History Key: {}", args.history_key);
    } else {
        info!("Server Address: {}", args.server_addr);
        info!("TLS Enabled: {}", args.enable_tls);
    }
    info!("-------------------------");

    let agent = Arc::new(FinanceAgent::new(&args)?);

    if args.interactive {
        let store = initialize_history_store(&args)?;
        let session = ChatSession::open(agent, store).await?;
        return cli::interactive::run(session).await;
    }

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, agent, args);
    server.run().await
}
