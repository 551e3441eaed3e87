//! Interactive chat client for the pakar expert system.
//!
//! This binary provides a REPL that sends each line to the answer service's
//! `/ask` endpoint and reveals the reply one character at a time.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a service on the default http://127.0.0.1:5000
//! pakar-chat
//!
//! # Point at another deployment
//! pakar-chat --url http://pakar.local:5000
//!
//! # Use the older {"question": ...} request body
//! pakar-chat --request-field question
//!
//! # Skip the welcome screen and keep history in memory
//! pakar-chat --no-welcome --ephemeral
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear the saved history
//! - `/history` - Show the saved history
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use pakar_chat::AnswerService;
use pakar_chat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, TerminalView, help_text, parse_command,
};

/// Main entry point for the pakar-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("pakar-chat [OPTIONS]");
    let config = ChatConfig::try_from(args)?;

    let mut session = ChatSession::from_config(&config)?;
    let mut view = TerminalView::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("Pakar Chat ({})", session.service().endpoint());
    session.load_history(&mut view);

    if config.show_welcome {
        println!();
        println!("Welcome! Describe your symptoms and the expert system will answer.");
        match rl.readline("Press Enter to start chatting...") {
            Ok(_) => {}
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }
    session.greet(&mut view).await;
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim());
                }

                // Check for slash commands
                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::ClearHistory => match session.clear_history(&mut view) {
                            Ok(()) => view.print_info("History cleared."),
                            Err(err) => {
                                view.print_error(&format!("Failed to clear history: {}", err))
                            }
                        },
                        ChatCommand::ShowHistory => match session.history_entries() {
                            Ok(entries) => print_history(&entries),
                            Err(err) => {
                                view.print_error(&format!("Failed to read history: {}", err))
                            }
                        },
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&config, &session);
                        }
                        ChatCommand::Invalid(message) => {
                            view.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the service
                session.submit(&line, &mut view).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                view.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_history(entries: &[String]) {
    if entries.is_empty() {
        println!("    History: (empty)");
    } else {
        println!("    History:");
        for entry in entries {
            println!("      - {}", entry);
        }
    }
}

fn print_stats<S: AnswerService>(session: &ChatSession<S>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Messages: {} sent / {} received", stats.user_messages, stats.bot_messages);
    println!(
        "      Requests: {} ({} failed)",
        stats.requests, stats.failures
    );
    println!(
        "      First message saved: {}",
        if stats.first_input_saved { "yes" } else { "no" }
    );
}

fn print_config(config: &ChatConfig, session: &ChatSession) {
    println!("    Current Configuration:");
    println!("      Endpoint: {}", session.service().endpoint());
    println!("      Request field: {}", session.service().request_field());
    match config.timeout {
        Some(timeout) => println!("      Timeout: {}s", timeout.as_secs()),
        None => println!("      Timeout: (none)"),
    }
    println!(
        "      Reveal delay: {}ms",
        session.reveal_delay().as_millis()
    );
    match config.history_path {
        Some(ref path) => println!("      History file: {}", path.display()),
        None => println!("      History file: (in memory)"),
    }
    println!(
        "      Colors: {}",
        if config.use_color { "on" } else { "off" }
    );
}
