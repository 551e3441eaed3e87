//! Progressive, character-by-character reveal of bot text.

use std::time::Duration;

use crate::observability::{REVEALED_CHARS, REVEALS};
use crate::view::ChatView;

/// Delay before each revealed character unless configured otherwise.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(50);

/// Reveals text into a [`ChatView`] one character at a time.
///
/// [`Revealer::reveal`] resolves only after the last character has been shown
/// and the message closed, so awaiting it is the completion signal.  The view
/// is borrowed mutably for the whole reveal, which keeps two reveals from ever
/// writing into the same message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revealer {
    delay: Duration,
}

impl Revealer {
    /// Creates a revealer that waits `delay` before each character.
    ///
    /// A zero delay still yields to the scheduler between characters.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The delay before each character.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reveal `text` as a new bot message in `view`.
    pub async fn reveal(&self, text: &str, view: &mut dyn ChatView) {
        REVEALS.click();
        view.begin_bot_message();
        for ch in text.chars() {
            self.tick().await;
            view.push_char(ch);
            REVEALED_CHARS.click();
        }
        view.finish_bot_message();
    }

    async fn tick(&self) {
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Revealer {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}
