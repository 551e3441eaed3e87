// Public modules
pub mod answer_response;
pub mod ask_request;
pub mod message;

// Re-exports
pub use answer_response::{AnswerResponse, NO_ANSWER_TEXT, Reply, SERVER_FAILURE_TEXT};
pub use ask_request::{AskRequest, RequestField, RequestFieldParseError};
pub use message::{Message, Sender};
