use crate::models::chat::{ ChatMessage, Role };
use crate::session::ChatSession;
use log::error;
use std::error::Error;
use tokio::io::{ self, AsyncBufReadExt, AsyncWriteExt, BufReader };

const CLEAR_COMMAND: &str = "/clear";
const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

fn render(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    };
    format!("{}: {}\n", speaker, message.content)
}

/// Terminal chat loop over stdin/stdout. Replays the stored history first.
pub async fn run(mut session: ChatSession) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    stdout.write_all(b"Financial Assistant (type /clear to reset, /quit to leave)\n").await?;
    for message in session.messages() {
        stdout.write_all(render(message).as_bytes()).await?;
    }

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if QUIT_COMMANDS.contains(&input) {
            break;
        }
        if input == CLEAR_COMMAND {
            if let Err(e) = session.clear().await {
                error!("Failed to clear chat history: {}", e);
                return Err(e);
            }
            stdout.write_all(b"History cleared.\n").await?;
            continue;
        }

        if let Some(reply) = session.submit(input).await? {
            let rendered = render(reply);
            stdout.write_all(rendered.as_bytes()).await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}
