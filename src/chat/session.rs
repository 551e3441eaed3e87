//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which mediates between the
//! input line, the answer service, the history log, and a [`ChatView`].

use crate::chat::config::ChatConfig;
use crate::client::{AnswerService, AskClient};
use crate::error::Result;
use crate::history::HistoryLog;
use crate::observability::{
    HISTORY_APPENDS, HISTORY_ERRORS, SESSION_EMPTY_SUBMISSIONS, SESSION_NO_ANSWER,
    SESSION_SERVER_ERRORS, SESSION_SERVER_FAILURES, SESSION_SUBMISSIONS,
};
use crate::reveal::Revealer;
use crate::store::{FileStore, MemoryStore};
use crate::types::{AnswerResponse, Message, Reply, SERVER_FAILURE_TEXT};
use crate::view::ChatView;

/// What became of one call to [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The input was empty after trimming; nothing happened.
    Empty,
    /// The service replied and the reply was revealed.
    Replied(Reply),
    /// The service could not be reached; the failure text was revealed.
    Failed,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// User messages rendered.
    pub user_messages: u64,
    /// Bot messages revealed, the greeting included.
    pub bot_messages: u64,
    /// Requests issued to the answer service.
    pub requests: u64,
    /// Requests that could not reach the server or returned an unreadable body.
    pub failures: u64,
    /// Whether this session's first input has been logged.
    pub first_input_saved: bool,
}

/// A chat session: one run of the client, from welcome screen to exit.
///
/// The session owns the answer service, the history log, and the flag that
/// limits the history to one entry per session.  Views are lent to each call.
pub struct ChatSession<S: AnswerService = AskClient> {
    service: S,
    history: HistoryLog,
    revealer: Revealer,
    greeting: String,
    first_input_saved: bool,
    stats: SessionStats,
}

impl ChatSession<AskClient> {
    /// Creates a session talking to the configured service and history file.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let client = AskClient::with_options(
            config.base_url.clone(),
            config.request_field,
            config.timeout,
        )?;
        let history = match &config.history_path {
            Some(path) => HistoryLog::new(FileStore::new(path)),
            None => HistoryLog::new(MemoryStore::new()),
        };
        Ok(Self::new(client, history, config))
    }
}

impl<S: AnswerService> ChatSession<S> {
    /// Creates a new session with a custom service and history log.
    pub fn new(service: S, history: HistoryLog, config: &ChatConfig) -> Self {
        Self {
            service,
            history,
            revealer: Revealer::new(config.reveal_delay),
            greeting: config.greeting.clone(),
            first_input_saved: false,
            stats: SessionStats {
                user_messages: 0,
                bot_messages: 0,
                requests: 0,
                failures: 0,
                first_input_saved: false,
            },
        }
    }

    /// The answer service this session asks.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Reveals the greeting.
    pub async fn greet(&mut self, view: &mut dyn ChatView) {
        let greeting = self.greeting.clone();
        self.reveal(&greeting, view).await;
    }

    /// Sends a line of user text and reveals the reply.
    ///
    /// This method:
    /// 1. Ignores input that is empty after trimming
    /// 2. Renders the user message
    /// 3. Logs the text to history if it is the session's first input
    /// 4. Clears the input surface
    /// 5. Asks the service and reveals the reply or the failure text
    ///
    /// Steps 2 to 4 happen before the request is issued.  No error escapes.
    pub async fn submit(&mut self, text: &str, view: &mut dyn ChatView) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            SESSION_EMPTY_SUBMISSIONS.click();
            return SubmitOutcome::Empty;
        }
        SESSION_SUBMISSIONS.click();

        view.append_message(&Message::user(text));
        self.stats.user_messages += 1;
        self.save_first_input(text, view);
        view.clear_input();

        self.stats.requests += 1;
        let result = self.service.ask(text).await;
        match result {
            Ok(response) => SubmitOutcome::Replied(self.on_server_reply(&response, view).await),
            Err(err) => {
                tracing::warn!(error = %err, "could not get an answer from the server");
                self.on_server_failure(view).await;
                SubmitOutcome::Failed
            }
        }
    }

    /// Reveals the reply carried by `response`.
    ///
    /// A follow-up is revealed only after the answer reveal has completed.
    pub async fn on_server_reply(
        &mut self,
        response: &AnswerResponse,
        view: &mut dyn ChatView,
    ) -> Reply {
        let reply = response.reply();
        match &reply {
            Reply::Answer { .. } => {}
            Reply::Error(message) => {
                SESSION_SERVER_ERRORS.click();
                tracing::info!(error = %message, "server reported an error");
            }
            Reply::NoAnswer => SESSION_NO_ANSWER.click(),
        }
        for text in reply.texts() {
            self.reveal(&text, view).await;
        }
        reply
    }

    /// Reveals the fixed text shown when the server could not be reached.
    pub async fn on_server_failure(&mut self, view: &mut dyn ChatView) {
        SESSION_SERVER_FAILURES.click();
        self.stats.failures += 1;
        self.reveal(SERVER_FAILURE_TEXT, view).await;
    }

    /// Renders the stored history into the sidebar, oldest first.
    ///
    /// Returns the number of entries rendered.  A history that cannot be read is
    /// rendered as empty.
    pub fn load_history(&mut self, view: &mut dyn ChatView) -> usize {
        match self.history.entries() {
            Ok(entries) => {
                for entry in &entries {
                    view.append_history_item(entry);
                }
                entries.len()
            }
            Err(err) => {
                HISTORY_ERRORS.click();
                tracing::warn!(error = %err, "could not load chat history");
                0
            }
        }
    }

    /// Erases the stored history and empties the sidebar.
    ///
    /// The sidebar is emptied even when the store fails.  The first-input flag
    /// is left alone, so a session that already logged its first input does not
    /// log again.
    pub fn clear_history(&mut self, view: &mut dyn ChatView) -> Result<()> {
        view.clear_history_items();
        self.history.clear().inspect_err(|err| {
            HISTORY_ERRORS.click();
            tracing::warn!(error = %err, "could not clear chat history");
        })
    }

    /// Returns the stored history, oldest first.
    pub fn history_entries(&self) -> Result<Vec<String>> {
        self.history.entries()
    }

    /// Returns true once this session's first input has been logged.
    pub fn first_input_saved(&self) -> bool {
        self.first_input_saved
    }

    /// The delay before each revealed character.
    pub fn reveal_delay(&self) -> std::time::Duration {
        self.revealer.delay()
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            first_input_saved: self.first_input_saved,
            ..self.stats.clone()
        }
    }

    fn save_first_input(&mut self, text: &str, view: &mut dyn ChatView) {
        if self.first_input_saved {
            return;
        }
        match self.history.append(text) {
            Ok(()) => HISTORY_APPENDS.click(),
            Err(err) => {
                HISTORY_ERRORS.click();
                tracing::warn!(error = %err, "could not save first input to history");
            }
        }
        view.append_history_item(text);
        self.first_input_saved = true;
    }

    async fn reveal(&mut self, text: &str, view: &mut dyn ChatView) {
        self.revealer.reveal(text, view).await;
        self.stats.bot_messages += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::Error;
    use crate::store::KeyValueStore;
    use crate::types::{NO_ANSWER_TEXT, Sender};
    use crate::view::{MemoryView, ViewEvent};

    /// Replays canned results and remembers what it was asked.
    #[derive(Default)]
    struct ScriptedService {
        replies: Mutex<VecDeque<Result<AnswerResponse>>>,
        asked: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn replying(replies: Vec<Result<AnswerResponse>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                asked: Mutex::new(Vec::new()),
            }
        }

        fn asked(&self) -> Vec<String> {
            self.asked.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl AnswerService for ScriptedService {
        async fn ask(&self, text: &str) -> Result<AnswerResponse> {
            self.asked.lock().unwrap().push(text.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(AnswerResponse::default()))
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _: &str) -> Result<Option<String>> {
            Err(Error::io(
                "storage denied",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        }

        fn set(&mut self, _: &str, _: &str) -> Result<()> {
            Err(Error::io(
                "quota exceeded",
                std::io::Error::from(std::io::ErrorKind::StorageFull),
            ))
        }

        fn remove(&mut self, _: &str) -> Result<()> {
            Err(Error::io(
                "storage denied",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        }
    }

    fn config() -> ChatConfig {
        ChatConfig::new()
            .with_history_path(None)
            .with_reveal_delay(Duration::ZERO)
    }

    fn session(replies: Vec<Result<AnswerResponse>>) -> ChatSession<ScriptedService> {
        ChatSession::new(
            ScriptedService::replying(replies),
            HistoryLog::new(MemoryStore::new()),
            &config(),
        )
    }

    #[tokio::test]
    async fn submit_renders_one_user_message() {
        let mut session = session(vec![Ok(AnswerResponse::answer("A"))]);
        let mut view = MemoryView::new();
        let outcome = session.submit("  telinga sakit  ", &mut view).await;
        assert!(matches!(outcome, SubmitOutcome::Replied(_)));
        assert_eq!(view.texts_from(Sender::User), vec!["telinga sakit"]);
        assert_eq!(session.service().asked(), vec!["telinga sakit".to_string()]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut session = session(vec![]);
        let mut view = MemoryView::new();
        for input in ["", "   ", "\t\n"] {
            assert_eq!(session.submit(input, &mut view).await, SubmitOutcome::Empty);
        }
        assert!(view.events().is_empty());
        assert!(session.service().asked().is_empty());
        assert!(!session.first_input_saved());
        assert!(session.history_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_first_submit_is_logged() {
        let mut session = session(vec![]);
        let mut view = MemoryView::new();
        session.submit("halo", &mut view).await;
        session.submit("tes", &mut view).await;
        assert_eq!(view.sidebar(), &["halo".to_string()]);
        assert_eq!(session.history_entries().unwrap(), vec!["halo".to_string()]);
        assert!(session.first_input_saved());
    }

    #[tokio::test]
    async fn user_message_precedes_request_and_reply() {
        let mut session = session(vec![Ok(AnswerResponse::answer("A").with_follow_up("B"))]);
        let mut view = MemoryView::new();
        session.submit("halo", &mut view).await;
        assert_eq!(
            view.events(),
            &[
                ViewEvent::Message(Message::user("halo")),
                ViewEvent::HistoryItem("halo".to_string()),
                ViewEvent::InputCleared,
                ViewEvent::BeginReveal,
                ViewEvent::RevealChar('A'),
                ViewEvent::FinishReveal,
                ViewEvent::BeginReveal,
                ViewEvent::RevealChar('B'),
                ViewEvent::FinishReveal,
            ]
        );
        assert_eq!(view.texts_from(Sender::Bot), vec!["A", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn follow_up_waits_for_answer() {
        let mut session = ChatSession::new(
            ScriptedService::replying(vec![Ok(
                AnswerResponse::answer("Gejala").with_follow_up("Apakah jawaban ini memadai?"),
            )]),
            HistoryLog::new(MemoryStore::new()),
            &config().with_reveal_delay(Duration::from_millis(50)),
        );
        let mut view = MemoryView::new();
        let start = tokio::time::Instant::now();
        session.submit("q", &mut view).await;
        let chars = "Gejala".chars().count() + "Apakah jawaban ini memadai?".chars().count();
        assert!(start.elapsed() >= Duration::from_millis(50 * chars as u64));

        let events = view.events();
        let first_finish = events
            .iter()
            .position(|e| *e == ViewEvent::FinishReveal)
            .unwrap();
        let second_begin = events
            .iter()
            .rposition(|e| *e == ViewEvent::BeginReveal)
            .unwrap();
        assert!(first_finish < second_begin);
        assert_eq!(
            view.texts_from(Sender::Bot),
            vec!["Gejala", "Apakah jawaban ini memadai?"]
        );
    }

    #[tokio::test]
    async fn server_error_is_prefixed() {
        let mut session = session(vec![Ok(AnswerResponse::error("X"))]);
        let mut view = MemoryView::new();
        let outcome = session.submit("halo", &mut view).await;
        assert_eq!(outcome, SubmitOutcome::Replied(Reply::Error("X".to_string())));
        assert_eq!(view.texts_from(Sender::Bot), vec!["Error: X"]);
        // A reported error is still a reply.
        assert_eq!(session.stats().failures, 0);
    }

    #[tokio::test]
    async fn empty_reply_is_no_answer() {
        let mut session = session(vec![Ok(AnswerResponse::default())]);
        let mut view = MemoryView::new();
        session.submit("halo", &mut view).await;
        assert_eq!(view.texts_from(Sender::Bot), vec![NO_ANSWER_TEXT]);
        assert_eq!(session.stats().failures, 0);
    }

    #[tokio::test]
    async fn transport_failure_shows_fallback() {
        let mut session = session(vec![
            Err(Error::connection("connection refused", None)),
            Ok(AnswerResponse::answer("A")),
        ]);
        let mut view = MemoryView::new();
        assert_eq!(session.submit("halo", &mut view).await, SubmitOutcome::Failed);
        assert_eq!(view.texts_from(Sender::Bot), vec![SERVER_FAILURE_TEXT]);

        // The session stays usable.
        session.submit("tes", &mut view).await;
        assert_eq!(view.texts_from(Sender::Bot), vec![SERVER_FAILURE_TEXT, "A"]);
        let stats = session.stats();
        assert_eq!(stats.requests, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.user_messages, 2);
        assert_eq!(stats.bot_messages, 2);
    }

    #[tokio::test]
    async fn clear_then_load_is_empty() {
        let mut session = session(vec![]);
        let mut view = MemoryView::new();
        session.submit("halo", &mut view).await;
        session.clear_history(&mut view).unwrap();
        assert!(view.sidebar().is_empty());

        let mut fresh = MemoryView::new();
        assert_eq!(session.load_history(&mut fresh), 0);
        assert!(fresh.sidebar().is_empty());
    }

    #[tokio::test]
    async fn clear_does_not_rearm_first_input() {
        let mut session = session(vec![]);
        let mut view = MemoryView::new();
        session.submit("halo", &mut view).await;
        session.clear_history(&mut view).unwrap();
        session.submit("tes", &mut view).await;
        assert!(view.sidebar().is_empty());
        assert!(session.history_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_history_keeps_order() {
        let mut history = HistoryLog::new(MemoryStore::new());
        history.append("pertama").unwrap();
        history.append("kedua").unwrap();
        let mut session = ChatSession::new(ScriptedService::default(), history, &config());
        let mut view = MemoryView::new();
        assert_eq!(session.load_history(&mut view), 2);
        assert_eq!(
            view.sidebar(),
            &["pertama".to_string(), "kedua".to_string()]
        );
    }

    #[tokio::test]
    async fn broken_storage_does_not_break_chat() {
        let mut session = ChatSession::new(
            ScriptedService::replying(vec![Ok(AnswerResponse::answer("A"))]),
            HistoryLog::new(BrokenStore),
            &config(),
        );
        let mut view = MemoryView::new();
        assert_eq!(session.load_history(&mut view), 0);

        let outcome = session.submit("halo", &mut view).await;
        assert!(matches!(outcome, SubmitOutcome::Replied(_)));
        assert_eq!(view.sidebar(), &["halo".to_string()]);
        assert!(session.first_input_saved());
        assert_eq!(view.texts_from(Sender::Bot), vec!["A"]);

        assert!(session.clear_history(&mut view).is_err());
        assert!(view.sidebar().is_empty());
    }

    #[tokio::test]
    async fn greet_reveals_greeting() {
        let mut session = ChatSession::new(
            ScriptedService::default(),
            HistoryLog::new(MemoryStore::new()),
            &config().with_greeting("Halo, ada yang bisa saya bantu?"),
        );
        let mut view = MemoryView::new();
        session.greet(&mut view).await;
        assert_eq!(
            view.messages(),
            &[Message::bot("Halo, ada yang bisa saya bantu?")]
        );
        assert!(session.service().asked().is_empty());
        assert_eq!(session.stats().bot_messages, 1);
    }

    #[test]
    fn from_config_uses_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut history = HistoryLog::new(FileStore::new(&path));
        history.append("halo").unwrap();

        let config = ChatConfig::new()
            .with_base_url("http://127.0.0.1:5000")
            .with_history_path(Some(path));
        let session = ChatSession::from_config(&config).unwrap();
        assert_eq!(session.history_entries().unwrap(), vec!["halo".to_string()]);
        assert_eq!(
            session.service().endpoint().as_str(),
            "http://127.0.0.1:5000/ask"
        );
    }
}
