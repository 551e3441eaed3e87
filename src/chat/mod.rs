//! Chat application module for conversations with the answer service.
//!
//! This module provides the REPL chat client built on top of the pakar-chat
//! library. It supports:
//!
//! - Character-by-character reveal of replies
//! - A history sidebar holding the first message of every session
//! - Slash commands for session control
//! - Configurable service URL, request contract, and reveal cadence
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and service interaction
//! - [`commands`]: Slash command parsing and handling
//! - [`render`]: Terminal output

mod commands;
mod config;
mod render;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_GREETING, default_history_path};
pub use render::TerminalView;
pub use session::{ChatSession, SessionStats, SubmitOutcome};
