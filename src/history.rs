//! Bounded message log.
//!
//! Mirrors the rendered list one-to-one: every entry here corresponds to one
//! node in the view, in the same order. Appends report which index (if any)
//! was evicted so the view can drop the matching node.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::chat_type::ChatType;
use crate::config::EvictionPolicy;

/// One rendered line in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// A message from a player.
    Chat {
        sender: String,
        chat_type: ChatType,
        /// Literal text; never parsed as markup.
        message: String,
        /// Local wall-clock time at render, `HH:MM` (24-hour).
        timestamp: String,
    },
    /// A locally generated notice. No sender, no timestamp.
    System { message: String },
}

impl LogEntry {
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    /// The text body of the entry.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Chat { message, .. } | Self::System { message } => message,
        }
    }
}

/// Append-only log with a fixed upper bound.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    policy: EvictionPolicy,
}

impl MessageLog {
    /// Create an empty log. A `capacity` of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self { entries: VecDeque::new(), capacity: capacity.max(1), policy }
    }

    /// Append an entry, evicting one if the bound is exceeded.
    ///
    /// Returns the index (before removal) of the evicted entry.
    pub fn push(&mut self, entry: LogEntry) -> Option<usize> {
        self.entries.push_back(entry);
        if self.entries.len() <= self.capacity {
            return None;
        }
        let index = self.eviction_index();
        self.entries.remove(index);
        Some(index)
    }

    fn eviction_index(&self) -> usize {
        // Pinning needs a second entry besides the one just appended.
        let pin_first = match self.policy {
            EvictionPolicy::PinFirst => true,
            EvictionPolicy::PinBanner => self.entries.front().is_some_and(LogEntry::is_system),
            EvictionPolicy::Fifo => false,
        };
        if pin_first && self.entries.len() > 2 { 1 } else { 0 }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}
