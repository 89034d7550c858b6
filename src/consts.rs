//! Shared constants for the chat overlay.

// ── Host bridge ─────────────────────────────────────────────────

/// Resource name the host serves outbound endpoints under (`https://rex-chat/...`).
pub const RESOURCE_NAME: &str = "rex-chat";

/// Durable key-value entry holding the persisted panel position.
pub const POSITION_STORAGE_KEY: &str = "chatPosition";

// ── Message log ─────────────────────────────────────────────────

/// Maximum number of rendered log entries.
pub const MAX_LOG_ENTRIES: usize = 100;

/// System notice appended when a send is attempted with an empty buffer.
pub const EMPTY_MESSAGE_NOTICE: &str = "Message cannot be empty.";

// ── Timing ──────────────────────────────────────────────────────

/// Delay between starting the close fade and hiding the panel, in milliseconds.
pub const CLOSE_DELAY_MS: u32 = 300;

/// Delay before scrolling the log after an append, in milliseconds.
///
/// Gives the browser one layout pass to measure the new entry.
pub const SCROLL_DELAY_MS: u32 = 10;

// ── Character counter ───────────────────────────────────────────

/// Counts above this are shown as a warning.
pub const COUNTER_WARNING_ABOVE: usize = 200;

/// Counts above this are shown as danger.
pub const COUNTER_DANGER_ABOVE: usize = 230;
