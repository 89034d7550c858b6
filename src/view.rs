//! Ports between the controller and the page it renders into.
//!
//! The controller never touches the DOM directly. It drives a [`ChatView`]
//! built from element handles resolved once at mount, reads the time through
//! a [`Clock`], and defers work through a [`Scheduler`] that calls
//! [`crate::controller::ChatController::on_timer`] when a timer fires.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use crate::chat_type::ChatType;
use crate::counter::CounterLevel;
use crate::history::LogEntry;
use crate::position::{Position, Size};

/// Which input receives keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Main,
    Whisper,
}

/// One-shot deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// End of the close animation. Only the most recent close is honored.
    FinishClose { generation: u64 },
    /// Scroll the log after the layout pass for a new entry.
    ScrollToBottom,
}

/// Rendering surface for the chat panel.
pub trait ChatView {
    /// Show or hide the panel.
    fn set_visible(&mut self, visible: bool);
    /// Apply or remove the fade-out styling.
    fn set_fading(&mut self, fading: bool);
    fn focus(&mut self, target: Focus);

    /// Activate the selector control for `chat_type`, deactivate the rest,
    /// and show `label` next to the input.
    fn show_chat_type(&mut self, chat_type: ChatType, label: &str);
    fn show_counter(&mut self, count: usize, level: CounterLevel);
    fn clear_main_input(&mut self);
    fn clear_whisper_input(&mut self);

    /// Reveal the whisper area addressed to `target_name`.
    fn show_whisper(&mut self, target_name: &str);
    fn hide_whisper(&mut self);

    /// Append a node for `entry` at the end of the log.
    fn append_entry(&mut self, entry: &LogEntry);
    /// Remove the log node at `index`.
    fn remove_entry(&mut self, index: usize);
    /// Text of log nodes already present before the controller mounted.
    fn prerendered_entries(&self) -> Vec<String> {
        Vec::new()
    }
    fn scroll_to_bottom(&mut self);

    /// Current top-left offset of the panel.
    fn panel_offset(&self) -> Position;
    fn panel_size(&self) -> Size;
    fn viewport_size(&self) -> Size;
    fn move_panel(&mut self, position: Position);
    /// Toggle the grabbing cursor and text-selection lock on the drag handle.
    fn set_grabbing(&mut self, grabbing: bool);
}

/// Local wall-clock time.
pub trait Clock {
    /// Hour (0-23) and minute (0-59) in local time.
    fn local_time(&self) -> (u32, u32);
}

/// One-shot timers without cancellation.
pub trait Scheduler {
    fn schedule(&mut self, delay_ms: u32, timer: Timer);
}

/// Format a 24-hour `HH:MM` timestamp.
#[must_use]
pub fn format_timestamp(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}
