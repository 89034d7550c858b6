//! Inbound host events.
//!
//! The host posts JSON messages with a `type` discriminator. They are decoded
//! into [`InboundEvent`] before reaching the controller, so the state machine
//! only ever sees well-formed variants. The controller reads events through
//! the [`EventSource`] trait rather than a global listener; the browser
//! binding feeds a [`QueuedEvents`] from the window `message` event and tests
//! push events directly.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::chat_type::{self, ChatType};
use crate::error::ChatError;

/// Opaque identifier of a whisper recipient.
///
/// Hosts send either a string or a number; the value is echoed back verbatim
/// in the `sendWhisper` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TargetId(Value);

impl TargetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(Value::String(id.into()))
    }

    #[must_use]
    pub fn from_number(id: i64) -> Self {
        Self(Value::from(id))
    }

    /// The raw JSON value as received from the host.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl<'de> Deserialize<'de> for TargetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            v @ (Value::String(_) | Value::Number(_)) => Ok(Self(v)),
            other => Err(serde::de::Error::custom(format!("targetId must be a string or number, got {other}"))),
        }
    }
}

/// A chat message delivered by the host.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMessage {
    /// Display name of the sender.
    pub sender: String,
    /// Channel; unknown values render with local style.
    #[serde(default, deserialize_with = "chat_type::deserialize_lenient")]
    pub chat_type: ChatType,
    /// Plain text body. Never interpreted as markup.
    pub message: String,
}

/// Every event the host can post to the overlay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundEvent {
    /// Show the panel.
    #[serde(rename = "chat:open")]
    Open,
    /// Hide the panel.
    #[serde(rename = "chat:close")]
    Close,
    /// Append a chat message to the log.
    #[serde(rename = "chat:message")]
    Message(IncomingMessage),
    /// Append a system notice to the log.
    #[serde(rename = "chat:system")]
    System { message: String },
    /// Enter whisper mode targeting a player.
    #[serde(rename = "chat:whisper", rename_all = "camelCase")]
    Whisper { target_id: TargetId, target_name: String },
}

impl InboundEvent {
    /// Decode an event from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::EventDecode`] for malformed JSON, unknown `type`
    /// values, or missing payload fields.
    pub fn from_json(raw: &str) -> Result<Self, ChatError> {
        serde_json::from_str(raw).map_err(ChatError::EventDecode)
    }

    /// Decode an event from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`InboundEvent::from_json`].
    pub fn from_value(value: Value) -> Result<Self, ChatError> {
        serde_json::from_value(value).map_err(ChatError::EventDecode)
    }

    /// The `type` discriminator this event was decoded from.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Open => "chat:open",
            Self::Close => "chat:close",
            Self::Message(_) => "chat:message",
            Self::System { .. } => "chat:system",
            Self::Whisper { .. } => "chat:whisper",
        }
    }
}

/// Injected source of inbound events.
pub trait EventSource {
    /// Take the next pending event, if any.
    fn next_event(&mut self) -> Option<InboundEvent>;
}

/// FIFO event source fed by the embedding layer.
#[derive(Debug, Default)]
pub struct QueuedEvents {
    queue: VecDeque<InboundEvent>,
}

impl QueuedEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an already-decoded event.
    pub fn push(&mut self, event: InboundEvent) {
        self.queue.push_back(event);
    }

    /// Decode and enqueue a raw host message.
    ///
    /// Messages that do not decode are logged and dropped; the error is
    /// returned so callers can inspect it.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::EventDecode`] when `raw` is not a known event.
    pub fn push_json(&mut self, raw: &str) -> Result<(), ChatError> {
        match InboundEvent::from_json(raw) {
            Ok(event) => {
                self.queue.push_back(event);
                Ok(())
            }
            Err(err) => {
                log::warn!("dropping inbound host message: {err}");
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSource for QueuedEvents {
    fn next_event(&mut self) -> Option<InboundEvent> {
        self.queue.pop_front()
    }
}
