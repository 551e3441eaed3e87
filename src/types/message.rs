use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a message in the transcript.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the chat.
    User,

    /// The answer service.
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single rendered chat message.
///
/// Messages are display state.  Once a view has rendered one it does not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The text shown for this message.
    pub text: String,

    /// Who sent the message.
    pub sender: Sender,
}

impl Message {
    /// Create a new message.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    /// Create a new bot message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    /// Returns true if the user sent this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
