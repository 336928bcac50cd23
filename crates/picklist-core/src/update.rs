//! Outward notifications to the owning application.
//!
//! A widget never talks to the backend directly. It hands [`UpdateMessage`]s
//! to an [`UpdateSink`] supplied by the application, which forwards them over
//! whatever transport it owns.

use crate::value::SelectionValue;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{PoisonError, RwLock};

/// A message dispatched to the owning application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateMessage {
    /// Ask the backend to push the current values of `names`.
    RequestUpdate {
        /// Widget identifier, if any
        id: Option<String>,
        /// Bound variable names to refresh
        names: Vec<String>,
    },
    /// Report a new value for a bound variable.
    SendUpdate {
        /// Bound variable name
        name: String,
        /// New value
        value: SelectionValue,
        /// Whether downstream values should be recomputed
        propagate: bool,
    },
}

impl UpdateMessage {
    /// Bound variable names this message concerns.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::RequestUpdate { names, .. } => names.iter().map(String::as_str).collect(),
            Self::SendUpdate { name, .. } => vec![name.as_str()],
        }
    }
}

/// Receiver of outward notifications.
pub trait UpdateSink: Send + Sync {
    /// Deliver one message. Must not block on the widget.
    fn dispatch(&self, message: UpdateMessage);
}

impl<F> UpdateSink for F
where
    F: Fn(UpdateMessage) + Send + Sync,
{
    fn dispatch(&self, message: UpdateMessage) {
        self(message);
    }
}

/// Sink that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl UpdateSink for NullSink {
    fn dispatch(&self, _message: UpdateMessage) {}
}

/// Sink that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: RwLock<Vec<UpdateMessage>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<UpdateMessage> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent message.
    #[must_use]
    pub fn last(&self) -> Option<UpdateMessage> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Drain all recorded messages.
    pub fn take(&self) -> Vec<UpdateMessage> {
        std::mem::take(&mut *self.messages.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UpdateSink for RecordingSink {
    fn dispatch(&self, message: UpdateMessage) {
        self.messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }
}

/// Sink that forwards messages into a channel.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<UpdateMessage>,
}

impl ChannelSink {
    /// Create a sink and the receiving end the application drains.
    #[must_use]
    pub fn new() -> (Self, Receiver<UpdateMessage>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl UpdateSink for ChannelSink {
    fn dispatch(&self, message: UpdateMessage) {
        if let Err(err) = self.sender.send(message) {
            tracing::debug!(message = ?err.0, "update receiver dropped, discarding message");
        }
    }
}
