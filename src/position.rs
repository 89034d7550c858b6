//! Panel geometry, drag sessions, and position persistence.
//!
//! The panel is positioned by its top-left corner in viewport pixels. A drag
//! session exists only between pointer-down and pointer-up on the handle;
//! only its final effect is persisted, as `{left, top}` JSON under a fixed
//! storage key.
//!
//! A restored position is not clamped on load. A position saved under a
//! larger viewport may leave the panel partly offscreen until the next drag.

#[cfg(test)]
#[path = "position_test.rs"]
mod position_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// A pointer location in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left offset of the panel within the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

impl Position {
    #[must_use]
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    /// Clamp so a panel of `panel` size lies fully inside `viewport`.
    ///
    /// When the panel is larger than the viewport on an axis, that axis pins
    /// to zero.
    #[must_use]
    pub fn clamped(self, viewport: Size, panel: Size) -> Self {
        let max_left = viewport.width - panel.width;
        let max_top = viewport.height - panel.height;
        Self {
            left: self.left.min(max_left).max(0.0),
            top: self.top.min(max_top).max(0.0),
        }
    }
}

/// State of the drag handle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Pointer is down on the handle.
    Dragging {
        /// Pointer location at pointer-down.
        start_pointer: Point,
        /// Panel offset at pointer-down.
        start_panel: Position,
        /// Panel offset after the most recent move.
        current: Position,
    },
}

impl DragState {
    /// Begin a session at `pointer` with the panel currently at `panel`.
    #[must_use]
    pub fn start(pointer: Point, panel: Position) -> Self {
        Self::Dragging { start_pointer: pointer, start_panel: panel, current: panel }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Panel offset for `pointer` during this session, clamped to the viewport.
    ///
    /// Returns `None` when idle.
    #[must_use]
    pub fn offset_for(&self, pointer: Point, viewport: Size, panel: Size) -> Option<Position> {
        let Self::Dragging { start_pointer, start_panel, .. } = *self else {
            return None;
        };
        let moved = Position::new(
            start_panel.left + (pointer.x - start_pointer.x),
            start_panel.top + (pointer.y - start_pointer.y),
        );
        Some(moved.clamped(viewport, panel))
    }

    /// Move the session to `pointer`, returning the new panel offset.
    pub fn update(&mut self, pointer: Point, viewport: Size, panel: Size) -> Option<Position> {
        let next = self.offset_for(pointer, viewport, panel)?;
        if let Self::Dragging { current, .. } = self {
            *current = next;
        }
        Some(next)
    }

    /// End the session, returning the final panel offset.
    pub fn finish(&mut self) -> Option<Position> {
        match std::mem::take(self) {
            Self::Dragging { current, .. } => Some(current),
            Self::Idle => None,
        }
    }
}

/// Durable string key-value storage (`localStorage` in the browser).
pub trait KeyValueStore {
    /// Read `key`. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Storage`] if the store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, ChatError>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Storage`] if the store rejects the write.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), ChatError>;
}

/// In-process store for native builds and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one entry.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.items.insert(key.to_owned(), value.to_owned());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, ChatError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), ChatError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Read the persisted position under `key`.
///
/// # Errors
///
/// Returns [`ChatError::Storage`] if the store fails and
/// [`ChatError::PositionDecode`] if the stored value is not `{left, top}`.
pub fn load_position(store: &dyn KeyValueStore, key: &str) -> Result<Option<Position>, ChatError> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    let position = serde_json::from_str(&raw).map_err(ChatError::PositionDecode)?;
    Ok(Some(position))
}

/// Persist `position` under `key`.
///
/// # Errors
///
/// Returns [`ChatError::Storage`] if the store rejects the write.
pub fn save_position(store: &mut dyn KeyValueStore, key: &str, position: Position) -> Result<(), ChatError> {
    let raw = serde_json::to_string(&position).map_err(|e| ChatError::Storage(e.to_string()))?;
    store.set_item(key, &raw)
}
