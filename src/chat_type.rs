//! Chat channel classification.
//!
//! The chat type governs host-side routing and the sender style of rendered
//! messages. The selector in the panel header picks the type attached to
//! every outgoing send request.

#[cfg(test)]
#[path = "chat_type_test.rs"]
mod chat_type_test;

use serde::{Deserialize, Deserializer, Serialize};

/// Which chat channel a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// Proximity chat (default).
    #[default]
    Local,
    /// Wide-radius shout.
    Shout,
    /// Out-of-character chat.
    Ooc,
    /// Job channel.
    Job,
    /// Staff channel.
    Admin,
}

impl ChatType {
    /// Every chat type in selector order.
    pub const ALL: [Self; 5] = [Self::Local, Self::Shout, Self::Ooc, Self::Job, Self::Admin];

    /// Wire name, also used as the sender style class.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Shout => "shout",
            Self::Ooc => "ooc",
            Self::Job => "job",
            Self::Admin => "admin",
        }
    }

    /// Label shown next to the input.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Shout => "SHOUT",
            Self::Ooc => "OOC",
            Self::Job => "JOB",
            Self::Admin => "ADMIN",
        }
    }

    /// Parse a wire name. Returns `None` for anything unrecognized.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Parse a wire name, falling back to [`ChatType::Local`].
    #[must_use]
    pub fn from_name_or_local(name: Option<&str>) -> Self {
        name.and_then(Self::from_name).unwrap_or_default()
    }
}

/// Deserialize a chat type leniently: unknown or non-string values become `Local`.
///
/// # Errors
///
/// Never fails on content; only propagates deserializer-level errors.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<ChatType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(ChatType::from_name_or_local(raw.as_str()))
}
