use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::escape::sanitize;
use crate::pending::PendingIndicator;
use crate::state::{History, Message, Sender};

/// The visible side of the chat: message history plus typing indicator.
///
/// Shared between the dispatcher, the poller and the front end. Every render
/// is one short append under the lock, so interleaved callers never reorder
/// entries.
#[derive(Debug, Default)]
pub struct ChatView {
    history: Mutex<History>,
    pending: PendingIndicator,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message. Text is escaped before it is stored.
    pub fn render(&self, text: &str, sender: Sender) {
        let message = Message::new(sanitize(text), sender);
        let mut history = self.lock();
        history.push(message);
        debug!(sender = sender.as_str(), len = history.len(), "rendered message");
    }

    pub fn pending(&self) -> &PendingIndicator {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the messages rendered so far
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages().to_vec()
    }

    /// Run `f` against the history without copying it
    pub fn with_history<R>(&self, f: impl FnOnce(&History) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
