//! UI-agnostic chat state types
//!
//! These types are shared between the client logic and any front end that
//! draws the conversation. They don't depend on a UI framework.

use chrono::{DateTime, Local};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Bot",
        }
    }
}

/// A single rendered chat entry. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    text: String,
    sender: Sender,
    timestamp: Option<DateTime<Local>>,
}

impl Message {
    /// Create a message stamped with the current local time
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Some(Local::now()),
        }
    }

    pub fn with_timestamp(text: impl Into<String>, sender: Sender, timestamp: Option<DateTime<Local>>) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        self.timestamp
    }

    /// Wall clock time as `HH:MM`, if the message carries a timestamp
    pub fn clock(&self) -> Option<String> {
        self.timestamp.map(|ts| ts.format("%H:%M").to_string())
    }

    /// Bot messages show accept/reject controls. They are decorative only.
    pub fn has_feedback_controls(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Append-only, chronologically ordered list of messages
#[derive(Debug, Clone, Default)]
pub struct History {
    messages: Vec<Message>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
