use biometrics::{Collector, Counter, Moments};

pub(crate) static ASK_REQUESTS: Counter = Counter::new("pakar_chat.client.requests");
pub(crate) static ASK_REQUEST_ERRORS: Counter = Counter::new("pakar_chat.client.request_errors");
pub(crate) static ASK_REQUEST_DURATION: Moments =
    Moments::new("pakar_chat.client.request_duration_seconds");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("pakar_chat.session.submissions");
pub(crate) static SESSION_EMPTY_SUBMISSIONS: Counter =
    Counter::new("pakar_chat.session.empty_submissions");
pub(crate) static SESSION_SERVER_FAILURES: Counter =
    Counter::new("pakar_chat.session.server_failures");
pub(crate) static SESSION_SERVER_ERRORS: Counter =
    Counter::new("pakar_chat.session.server_errors");
pub(crate) static SESSION_NO_ANSWER: Counter = Counter::new("pakar_chat.session.no_answer");

pub(crate) static REVEALS: Counter = Counter::new("pakar_chat.reveal.reveals");
pub(crate) static REVEALED_CHARS: Counter = Counter::new("pakar_chat.reveal.chars");

pub(crate) static HISTORY_APPENDS: Counter = Counter::new("pakar_chat.history.appends");
pub(crate) static HISTORY_ERRORS: Counter = Counter::new("pakar_chat.history.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&ASK_REQUESTS);
    collector.register_counter(&ASK_REQUEST_ERRORS);
    collector.register_moments(&ASK_REQUEST_DURATION);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_EMPTY_SUBMISSIONS);
    collector.register_counter(&SESSION_SERVER_FAILURES);
    collector.register_counter(&SESSION_SERVER_ERRORS);
    collector.register_counter(&SESSION_NO_ANSWER);

    collector.register_counter(&REVEALS);
    collector.register_counter(&REVEALED_CHARS);

    collector.register_counter(&HISTORY_APPENDS);
    collector.register_counter(&HISTORY_ERRORS);
}
