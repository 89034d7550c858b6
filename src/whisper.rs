//! Whisper sub-mode state.
//!
//! The target is a single `Option`, so an id without a name (or the reverse)
//! cannot be represented. Whisper mode is active exactly when a target is set.

#[cfg(test)]
#[path = "whisper_test.rs"]
mod whisper_test;

use crate::event::TargetId;

/// The recipient of a whisper.
#[derive(Debug, Clone, PartialEq)]
pub struct WhisperTarget {
    pub id: TargetId,
    pub name: String,
}

/// Whisper mode: inactive, or active with a target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhisperState {
    target: Option<WhisperTarget>,
}

impl WhisperState {
    /// Enter whisper mode, replacing any existing target.
    pub fn start(&mut self, id: TargetId, name: String) {
        self.target = Some(WhisperTarget { id, name });
    }

    /// Leave whisper mode, returning the previous target.
    pub fn clear(&mut self) -> Option<WhisperTarget> {
        self.target.take()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn target(&self) -> Option<&WhisperTarget> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn target_id(&self) -> Option<&TargetId> {
        self.target.as_ref().map(|t| &t.id)
    }

    #[must_use]
    pub fn target_name(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.name.as_str())
    }
}
