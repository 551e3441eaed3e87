//! Terminal rendering for the chat application.
//!
//! [`TerminalView`] writes the transcript to stdout, styling the bot label and
//! the history sidebar with ANSI escape codes unless color is disabled.

use std::io::{self, Stdout, Write};

use crate::types::Message;
use crate::view::ChatView;

/// ANSI escape code for dim text (used for history entries).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the bot label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Label printed before every bot message.
const BOT_LABEL: &str = "Bot:";

/// A [`ChatView`] that prints to the terminal.
pub struct TerminalView {
    stdout: Stdout,
    use_color: bool,
    in_bot_message: bool,
}

impl TerminalView {
    /// Creates a new TerminalView with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new TerminalView with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            in_bot_message: false,
        }
    }

    /// Returns true if ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print an error message.
    pub fn print_error(&mut self, error: &str) {
        self.end_line();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    /// Print an informational message.
    pub fn print_info(&mut self, info: &str) {
        self.end_line();
        println!("{info}");
    }

    /// Flushes stdout so revealed characters appear immediately.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn end_line(&mut self) {
        if self.in_bot_message {
            println!();
            self.in_bot_message = false;
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_color {
            format!("{ANSI_DIM}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for TerminalView {
    fn append_message(&mut self, message: &Message) {
        // The line editor already echoed what the user typed.
        if !message.is_user() {
            self.begin_bot_message();
            print!("{}", message.text);
            self.finish_bot_message();
        }
    }

    fn begin_bot_message(&mut self) {
        self.end_line();
        if self.use_color {
            print!("{ANSI_CYAN}{BOT_LABEL}{ANSI_RESET} ");
        } else {
            print!("{BOT_LABEL} ");
        }
        self.in_bot_message = true;
        self.flush();
    }

    fn push_char(&mut self, ch: char) {
        print!("{ch}");
        self.flush();
    }

    fn finish_bot_message(&mut self) {
        self.end_line();
        self.flush();
    }

    fn append_history_item(&mut self, text: &str) {
        self.end_line();
        let line = self.dim(&format!("  [history] {text}"));
        println!("{line}");
    }

    fn clear_history_items(&mut self) {
        self.end_line();
        let line = self.dim("  [history cleared]");
        println!("{line}");
    }
}
