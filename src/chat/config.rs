//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::error::{Error, Result};
use crate::reveal::DEFAULT_REVEAL_DELAY;
use crate::types::RequestField;

/// Greeting revealed when the welcome gate is dismissed.
pub const DEFAULT_GREETING: &str = "Halo, ada yang bisa saya bantu?";

/// Command-line arguments for the pakar-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the answer service.
    #[arrrg(optional, "Answer service base URL (default: $PAKAR_CHAT_URL or http://127.0.0.1:5000)", "URL")]
    pub url: Option<String>,

    /// JSON field carrying the user's text.
    #[arrrg(optional, "Request field: query or question (default: query)", "FIELD")]
    pub request_field: Option<String>,

    /// Where the chat history is stored.
    #[arrrg(optional, "History storage file", "PATH")]
    pub history_file: Option<String>,

    /// Delay before each revealed character.
    #[arrrg(optional, "Milliseconds per revealed character (default: 50)", "MS")]
    pub reveal_delay_ms: Option<u64>,

    /// Request timeout.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECS")]
    pub timeout_secs: Option<u64>,

    /// Greeting shown after the welcome screen.
    #[arrrg(optional, "Greeting shown when the chat starts", "TEXT")]
    pub greeting: Option<String>,

    /// Skip the welcome screen.
    #[arrrg(flag, "Skip the welcome screen")]
    pub no_welcome: bool,

    /// Keep history in memory only.
    #[arrrg(flag, "Do not persist history to disk")]
    pub ephemeral: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the answer service.  `None` defers to the environment.
    pub base_url: Option<String>,

    /// JSON field carrying the user's text.
    pub request_field: RequestField,

    /// Where history is stored.  `None` keeps history in memory.
    pub history_path: Option<PathBuf>,

    /// Delay before each revealed character.
    pub reveal_delay: Duration,

    /// Optional request timeout.
    pub timeout: Option<Duration>,

    /// Greeting revealed once the chat starts.
    pub greeting: String,

    /// Whether to wait at a welcome screen before greeting.
    pub show_welcome: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: from the environment
    /// - Request field: query
    /// - History: the platform data directory
    /// - Reveal delay: 50ms
    /// - Timeout: none
    /// - Welcome screen: shown
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            request_field: RequestField::default(),
            history_path: Some(default_history_path()),
            reveal_delay: DEFAULT_REVEAL_DELAY,
            timeout: None,
            greeting: DEFAULT_GREETING.to_string(),
            show_welcome: true,
            use_color: true,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request field.
    pub fn with_request_field(mut self, request_field: RequestField) -> Self {
        self.request_field = request_field;
        self
    }

    /// Sets the history path.  `None` keeps history in memory.
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Sets the reveal delay.
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Skips the welcome screen.
    pub fn without_welcome(mut self) -> Self {
        self.show_welcome = false;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = Error;

    fn try_from(args: ChatArgs) -> Result<Self> {
        let request_field = match args.request_field {
            Some(field) => field.parse::<RequestField>().map_err(|err| {
                Error::validation(err.to_string(), Some("request-field".to_string()))
            })?,
            None => RequestField::default(),
        };
        let history_path = if args.ephemeral {
            None
        } else {
            Some(
                args.history_file
                    .map(PathBuf::from)
                    .unwrap_or_else(default_history_path),
            )
        };

        Ok(ChatConfig {
            base_url: args.url,
            request_field,
            history_path,
            reveal_delay: args
                .reveal_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REVEAL_DELAY),
            timeout: args.timeout_secs.map(Duration::from_secs),
            greeting: args
                .greeting
                .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
            show_welcome: !args.no_welcome,
            use_color: !args.no_color,
        })
    }
}

/// `<data dir>/pakar-chat/storage.json`, or `.pakar-chat/storage.json` when the
/// platform has no data directory.
pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("pakar-chat"))
        .unwrap_or_else(|| PathBuf::from(".pakar-chat"))
        .join("storage.json")
}
