//! Assistant commands.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use techsphere_storefront::assistant::{ChatSession, GREETING};
use techsphere_storefront::state::AppState;

use super::CliError;

const EXIT_WORDS: [&str; 3] = ["sair", "exit", "quit"];

/// Ask a single question with the current catalog as context.
pub async fn ask(state: &AppState, message: &str) -> Result<(), CliError> {
    let catalog = state.catalog().load().await;
    let reply = state.assistant().ask(message, catalog.products()).await;
    writeln!(io::stdout().lock(), "{reply}")?;
    Ok(())
}

/// Interactive chat on stdin until EOF or an exit word.
pub async fn chat(state: &AppState) -> Result<(), CliError> {
    let catalog = state.catalog().load().await;
    let mut session = ChatSession::new();
    writeln!(io::stdout().lock(), "TechSphere AI: {GREETING}")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(io::stdout().lock(), "> ")?;
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if EXIT_WORDS.contains(&line.trim().to_lowercase().as_str()) {
            break;
        }

        if let Some(reply) = session
            .send(state.assistant(), &line, catalog.products())
            .await
        {
            writeln!(io::stdout().lock(), "TechSphere AI: {}", reply.text)?;
        }
    }

    tracing::debug!(messages = session.messages().len(), "Chat ended");
    Ok(())
}
