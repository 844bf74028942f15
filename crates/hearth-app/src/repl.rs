//! Interactive terminal chat.
//!
//! Lines are sent to the orchestrator as messages; lines starting with `/`
//! are commands.

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

use hearth_chat::{ChatOrchestrator, ChatOutcome, IncomingMessage};

pub const HELP: &str = "\
Commands:
  /image PATH [message]  send a photo, optionally with a description
  /location [TEXT]       set (or clear) your location
  /stats                 show conversation statistics
  /clear                 start the conversation over
  /help                  show this help
  /quit                  leave";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Message(String),
    Image { path: PathBuf, text: String },
    Location(Option<String>),
    Stats,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_input(line: &str) -> ReplInput {
    let line = line.trim();
    if line.is_empty() {
        return ReplInput::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return ReplInput::Message(line.to_string());
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    match name {
        "image" if !rest.is_empty() => {
            let (path, text) = match rest.split_once(char::is_whitespace) {
                Some((path, text)) => (path, text.trim()),
                None => (rest, ""),
            };
            ReplInput::Image {
                path: PathBuf::from(path),
                text: text.to_string(),
            }
        }
        "location" => ReplInput::Location(Some(rest.to_string()).filter(|l| !l.is_empty())),
        "stats" => ReplInput::Stats,
        "clear" => ReplInput::Clear,
        "help" => ReplInput::Help,
        "quit" | "exit" => ReplInput::Quit,
        _ => ReplInput::Unknown(line.to_string()),
    }
}

fn render_outcome(outcome: &ChatOutcome) -> String {
    format!(
        "[{}] {}\n\n{}\n",
        outcome.handler.display_name(),
        outcome.explanation,
        outcome.reply
    )
}

/// Run the chat loop on stdin/stdout until `/quit` or end of input.
pub async fn run(
    orchestrator: &ChatOrchestrator,
    location: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = orchestrator.create_session(location)?;
    let sid: Uuid = session.id;
    tracing::info!(session_id = %sid, "Interactive chat started");

    let mut out = tokio::io::stdout();
    if let Some(welcome) = session.log.turns().first() {
        out.write_all(format!("{}\n\n{}\n\n", welcome.text, HELP).as_bytes())
            .await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let text = match parse_input(&line) {
            ReplInput::Empty => continue,
            ReplInput::Quit => break,
            ReplInput::Help => format!("{}\n", HELP),
            ReplInput::Unknown(cmd) => format!("Unknown command: {} (try /help)\n", cmd),
            ReplInput::Clear => {
                orchestrator.clear_session(sid)?;
                "Conversation cleared.\n".to_string()
            }
            ReplInput::Location(location) => {
                orchestrator.set_location(sid, location)?;
                match orchestrator.get_session(sid)?.and_then(|s| s.location) {
                    Some(l) => format!("Location set to {}.\n", l),
                    None => "Location cleared.\n".to_string(),
                }
            }
            ReplInput::Stats => {
                let stats = orchestrator.stats(sid)?;
                let summary = orchestrator.summarize(sid)?;
                let confidence = stats
                    .average_confidence
                    .map(|c| format!("{:.0}%", c * 100.0))
                    .unwrap_or_else(|| "n/a".to_string());
                format!(
                    "Messages: {} ({} from you, {} replies), images: {}, average confidence: {}\n\
                     Handler usage: clarify {}, issue {}, tenancy {} ({:?})\n",
                    stats.total_messages,
                    stats.user_messages,
                    stats.assistant_messages,
                    stats.images_uploaded,
                    confidence,
                    summary.usage.clarify,
                    summary.usage.issue,
                    summary.usage.tenancy,
                    summary.flavor,
                )
            }
            ReplInput::Message(text) => {
                send(orchestrator, sid, IncomingMessage::text(text)).await
            }
            ReplInput::Image { path, text } => match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string());
                    match IncomingMessage::text(text).with_image_bytes(bytes, name) {
                        Ok(message) => send(orchestrator, sid, message).await,
                        Err(e) => format!("Cannot send {}: {}\n", path.display(), e),
                    }
                }
                Err(e) => format!("Cannot read {}: {}\n", path.display(), e),
            },
        };
        out.write_all(text.as_bytes()).await?;
    }

    tracing::info!(session_id = %sid, "Interactive chat ended");
    Ok(())
}

async fn send(orchestrator: &ChatOrchestrator, sid: Uuid, message: IncomingMessage) -> String {
    match orchestrator.handle_message(Some(sid), message).await {
        Ok(outcome) => render_outcome(&outcome),
        Err(e) => format!("Error: {}\n", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message() {
        assert_eq!(
            parse_input("  my sink leaks "),
            ReplInput::Message("my sink leaks".to_string())
        );
        assert_eq!(parse_input("   "), ReplInput::Empty);
    }

    #[test]
    fn test_image_command() {
        assert_eq!(
            parse_input("/image wall.jpg is this mold?"),
            ReplInput::Image {
                path: PathBuf::from("wall.jpg"),
                text: "is this mold?".to_string()
            }
        );
        assert_eq!(
            parse_input("/image wall.jpg"),
            ReplInput::Image {
                path: PathBuf::from("wall.jpg"),
                text: String::new()
            }
        );
        assert!(matches!(parse_input("/image"), ReplInput::Unknown(_)));
    }

    #[test]
    fn test_location_command() {
        assert_eq!(
            parse_input("/location Austin, Texas"),
            ReplInput::Location(Some("Austin, Texas".to_string()))
        );
        assert_eq!(parse_input("/location"), ReplInput::Location(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_input("/stats"), ReplInput::Stats);
        assert_eq!(parse_input("/clear"), ReplInput::Clear);
        assert_eq!(parse_input("/quit"), ReplInput::Quit);
        assert_eq!(parse_input("/exit"), ReplInput::Quit);
        assert_eq!(parse_input("/help"), ReplInput::Help);
        assert_eq!(
            parse_input("/dance"),
            ReplInput::Unknown("/dance".to_string())
        );
    }
}
