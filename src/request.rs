//! Outbound requests to the host.
//!
//! Requests are fire-and-forget POSTs to fixed local endpoints. The
//! controller never awaits a response; anything the host wants to say back
//! arrives later as an independent [`crate::event::InboundEvent`].

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use serde_json::{Value, json};

use crate::chat_type::ChatType;
use crate::event::TargetId;

/// A request the overlay posts to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Deliver a message on the selected channel.
    SendMessage { chat_type: ChatType, message: String },
    /// Deliver a private message to one player.
    SendWhisper { target_id: TargetId, message: String },
    /// The panel started closing.
    CloseChat,
    /// Replay the backlog as inbound message events.
    GetChatHistory,
}

impl HostRequest {
    /// Endpoint name under the host resource.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::SendMessage { .. } => "sendMessage",
            Self::SendWhisper { .. } => "sendWhisper",
            Self::CloseChat => "closeChat",
            Self::GetChatHistory => "getChatHistory",
        }
    }

    /// JSON body posted with the request.
    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            Self::SendMessage { chat_type, message } => json!({
                "chatType": chat_type,
                "message": message,
            }),
            Self::SendWhisper { target_id, message } => json!({
                "targetId": target_id,
                "message": message,
            }),
            Self::CloseChat | Self::GetChatHistory => json!({}),
        }
    }

    /// Full endpoint URL, e.g. `https://rex-chat/sendMessage`.
    #[must_use]
    pub fn url(&self, resource_name: &str) -> String {
        format!("https://{resource_name}/{}", self.endpoint())
    }
}

/// Outbound half of the host boundary.
///
/// Implementations hand the request off and return immediately. Delivery
/// failures are the host's responsibility and are not reported back.
pub trait HostBridge {
    fn post(&mut self, request: HostRequest);
}
