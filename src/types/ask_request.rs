use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The JSON field that carries the user's text in an `/ask` request.
///
/// The chat widget and the service's `/ask` route agree on `query`.  An older
/// diagnosis form posted `question` to the same path; it is kept selectable so
/// deployments built against that contract keep working.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestField {
    /// `{"query": ...}`
    #[default]
    Query,

    /// `{"question": ...}`
    Question,
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestField::Query => write!(f, "query"),
            RequestField::Question => write!(f, "question"),
        }
    }
}

/// Error returned when parsing an invalid request field string.
#[derive(Debug)]
pub struct RequestFieldParseError {
    /// The invalid string value that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for RequestFieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown request field: {} (expected query or question)",
            self.invalid_value
        )
    }
}

impl std::error::Error for RequestFieldParseError {}

impl FromStr for RequestField {
    type Err = RequestFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "query" => Ok(RequestField::Query),
            "question" => Ok(RequestField::Question),
            _ => Err(RequestFieldParseError {
                invalid_value: s.to_string(),
            }),
        }
    }
}

/// The JSON body posted to `/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AskRequest {
    /// Body using the `query` field.
    Query {
        /// The user's text.
        query: String,
    },

    /// Body using the `question` field.
    Question {
        /// The user's text.
        question: String,
    },
}

impl AskRequest {
    /// Build a request body for `text` using `field`.
    pub fn new(field: RequestField, text: impl Into<String>) -> Self {
        match field {
            RequestField::Query => AskRequest::Query { query: text.into() },
            RequestField::Question => AskRequest::Question {
                question: text.into(),
            },
        }
    }
}
