//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the answer service.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Erase the stored history and empty the sidebar.
    ClearHistory,

    /// List the stored history.
    ShowHistory,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be submitted as a regular message.
///
/// # Examples
///
/// ```
/// # use pakar_chat::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/clear").is_some());
/// assert!(parse_command("telinga saya berdenging").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => no_argument(argument, ChatCommand::ClearHistory, "/clear"),
        "history" => no_argument(argument, ChatCommand::ShowHistory, "/history"),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn no_argument(argument: Option<&str>, command: ChatCommand, name: &str) -> ChatCommand {
    match argument {
        Some(_) => ChatCommand::Invalid(format!("{name} takes no arguments")),
        None => command,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear the saved chat history
  /history               Show the saved chat history
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
