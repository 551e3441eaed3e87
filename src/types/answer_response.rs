use serde::{Deserialize, Serialize};

/// Text shown when the service replied but had nothing to say.
pub const NO_ANSWER_TEXT: &str = "Tidak ada jawaban tersedia.";

/// Text shown when the service could not be reached or replied with garbage.
pub const SERVER_FAILURE_TEXT: &str = "Terjadi kesalahan saat menghubungi server.";

/// The JSON body returned by the `/ask` endpoint.
///
/// No field is guaranteed to be present.  Fields the client does not know about
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// The primary answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// A follow-up prompt shown after the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<String>,

    /// An application error reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What the chat shows for an [`AnswerResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Reveal the answer, then the follow-up once the answer is complete.
    Answer {
        /// The answer text.
        answer: String,
        /// The follow-up text, if any.
        follow_up: Option<String>,
    },

    /// Reveal `"Error: {message}"`.
    Error(String),

    /// Reveal [`NO_ANSWER_TEXT`].
    NoAnswer,
}

impl AnswerResponse {
    /// Create a response carrying only an answer.
    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..Self::default()
        }
    }

    /// Sets the follow-up text.
    pub fn with_follow_up(mut self, follow_up: impl Into<String>) -> Self {
        self.follow_up = Some(follow_up.into());
        self
    }

    /// Create a response carrying only an application error.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Decide what to show for this response.
    ///
    /// Empty strings count as absent.  A follow-up is only shown together with an
    /// answer.
    pub fn reply(&self) -> Reply {
        fn present(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|s| !s.is_empty())
        }
        if let Some(answer) = present(&self.answer) {
            Reply::Answer {
                answer: answer.to_string(),
                follow_up: present(&self.follow_up).map(str::to_string),
            }
        } else if let Some(error) = present(&self.error) {
            Reply::Error(error.to_string())
        } else {
            Reply::NoAnswer
        }
    }
}

impl Reply {
    /// The texts to reveal, in order.
    pub fn texts(&self) -> Vec<String> {
        match self {
            Reply::Answer { answer, follow_up } => {
                let mut texts = vec![answer.clone()];
                texts.extend(follow_up.iter().cloned());
                texts
            }
            Reply::Error(message) => vec![format!("Error: {message}")],
            Reply::NoAnswer => vec![NO_ANSWER_TEXT.to_string()],
        }
    }
}
