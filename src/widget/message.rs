//! Log entries and quick-reply button sets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single entry in the message log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
}

impl Message {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), text: text.into(), sender: Sender::User }
    }

    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), text: text.into(), sender: Sender::Bot }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReplyOption {
    pub label: String,
    pub value: String,
}

/// An ordered group of quick-reply buttons, identified by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReplySet {
    pub id: String,
    pub options: Vec<QuickReplyOption>,
}

impl QuickReplySet {
    /// Find the option carrying `value`.
    #[must_use]
    pub fn option(&self, value: &str) -> Option<&QuickReplyOption> {
        self.options.iter().find(|o| o.value == value)
    }
}
