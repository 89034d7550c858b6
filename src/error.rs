//! Error taxonomy for the chat overlay.
//!
//! ERROR HANDLING
//! ==============
//! None of these are fatal. The controller recovers from every variant
//! locally: user input errors become in-log notices, storage and decode
//! failures are logged and dropped, and outbound request failures are the
//! host's concern once the request has been handed off.

/// Errors surfaced by the overlay's ports.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The durable key-value store could not be read or written.
    #[error("storage unavailable: {0}")]
    Storage(String),
    /// A persisted position entry exists but is not valid `{left, top}` JSON.
    #[error("failed to decode stored position: {0}")]
    PositionDecode(#[source] serde_json::Error),
    /// An inbound host message could not be decoded into a known event.
    #[error("failed to decode inbound event: {0}")]
    EventDecode(#[source] serde_json::Error),
    /// The overlay configuration JSON is malformed.
    #[error("failed to decode config: {0}")]
    ConfigDecode(#[source] serde_json::Error),
    /// An outbound request could not be handed to the host.
    #[error("host bridge request to `{endpoint}` failed: {message}")]
    Bridge { endpoint: &'static str, message: String },
    /// A required view element is missing or has the wrong type.
    #[error("view element `{0}` not found")]
    MissingElement(String),
}
