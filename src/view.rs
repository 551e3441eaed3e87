//! Display surfaces for a chat session.
//!
//! A [`ChatView`] is everything the session is allowed to touch on screen: the
//! transcript, the history sidebar, and the input line.  The session never
//! reads back from a view.

use crate::types::{Message, Sender};

/// Trait for rendering a chat session.
///
/// This abstraction allows for different display strategies:
/// - ANSI terminal output for the interactive binary
/// - In-memory recording for tests and embedding
pub trait ChatView: Send {
    /// Render a complete message.
    fn append_message(&mut self, message: &Message);

    /// Open a new, empty bot message that subsequent [`push_char`] calls grow.
    ///
    /// [`push_char`]: ChatView::push_char
    fn begin_bot_message(&mut self);

    /// Append one character to the open bot message.
    fn push_char(&mut self, ch: char);

    /// Close the open bot message.
    fn finish_bot_message(&mut self);

    /// Add an entry to the bottom of the history sidebar.
    fn append_history_item(&mut self, text: &str);

    /// Remove every entry from the history sidebar.
    fn clear_history_items(&mut self);

    /// Empty the input surface after a submission.
    fn clear_input(&mut self) {}
}

/// One observable change made to a [`MemoryView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A complete message was rendered.
    Message(Message),
    /// A bot message was opened for revealing.
    BeginReveal,
    /// A character was revealed.
    RevealChar(char),
    /// The open bot message was closed.
    FinishReveal,
    /// A sidebar entry was added.
    HistoryItem(String),
    /// The sidebar was emptied.
    HistoryCleared,
    /// The input surface was emptied.
    InputCleared,
}

/// A [`ChatView`] that keeps everything in memory.
///
/// Besides the current transcript and sidebar it records an ordered event log,
/// which makes ordering between reveals observable.
#[derive(Debug, Default)]
pub struct MemoryView {
    messages: Vec<Message>,
    sidebar: Vec<String>,
    events: Vec<ViewEvent>,
    revealing: bool,
}

impl MemoryView {
    /// Creates an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in the transcript, in render order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Texts of the messages sent by `sender`.
    pub fn texts_from(&self, sender: Sender) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.sender == sender)
            .map(|m| m.text.as_str())
            .collect()
    }

    /// Entries currently shown in the history sidebar.
    pub fn sidebar(&self) -> &[String] {
        &self.sidebar
    }

    /// Every change made to this view, in order.
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    /// Returns true while a bot message is open.
    pub fn is_revealing(&self) -> bool {
        self.revealing
    }
}

impl ChatView for MemoryView {
    fn append_message(&mut self, message: &Message) {
        self.messages.push(message.clone());
        self.events.push(ViewEvent::Message(message.clone()));
    }

    fn begin_bot_message(&mut self) {
        self.messages.push(Message::bot(String::new()));
        self.revealing = true;
        self.events.push(ViewEvent::BeginReveal);
    }

    fn push_char(&mut self, ch: char) {
        if let Some(message) = self.messages.last_mut()
            && self.revealing
        {
            message.text.push(ch);
        }
        self.events.push(ViewEvent::RevealChar(ch));
    }

    fn finish_bot_message(&mut self) {
        self.revealing = false;
        self.events.push(ViewEvent::FinishReveal);
    }

    fn append_history_item(&mut self, text: &str) {
        self.sidebar.push(text.to_string());
        self.events.push(ViewEvent::HistoryItem(text.to_string()));
    }

    fn clear_history_items(&mut self) {
        self.sidebar.clear();
        self.events.push(ViewEvent::HistoryCleared);
    }

    fn clear_input(&mut self) {
        self.events.push(ViewEvent::InputCleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_grows_one_message() {
        let mut view = MemoryView::new();
        view.append_message(&Message::user("halo"));
        view.begin_bot_message();
        assert!(view.is_revealing());
        for ch in "hi!".chars() {
            view.push_char(ch);
        }
        view.finish_bot_message();
        assert!(!view.is_revealing());
        assert_eq!(
            view.messages(),
            &[Message::user("halo"), Message::bot("hi!")]
        );
        assert_eq!(view.texts_from(Sender::Bot), vec!["hi!"]);
    }

    #[test]
    fn sidebar_tracks_items() {
        let mut view = MemoryView::new();
        view.append_history_item("halo");
        view.append_history_item("tes");
        assert_eq!(view.sidebar(), &["halo".to_string(), "tes".to_string()]);
        view.clear_history_items();
        assert!(view.sidebar().is_empty());
        assert_eq!(view.events().last(), Some(&ViewEvent::HistoryCleared));
    }
}
