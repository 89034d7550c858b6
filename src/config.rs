//! Overlay configuration.
//!
//! Every tunable has a default matching the stock overlay. The embedding
//! page may pass a JSON object to override any subset of fields; missing
//! fields keep their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    CLOSE_DELAY_MS, COUNTER_DANGER_ABOVE, COUNTER_WARNING_ABOVE, MAX_LOG_ENTRIES, POSITION_STORAGE_KEY,
    RESOURCE_NAME, SCROLL_DELAY_MS,
};
use crate::error::ChatError;

/// Which entry the message log drops when it exceeds its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Never evict the first entry; drop the one after it. The first entry
    /// is assumed to be a welcome banner.
    #[default]
    PinFirst,
    /// Pin the first entry only while it is a system notice; otherwise FIFO.
    PinBanner,
    /// Strict FIFO: always drop the oldest entry.
    Fifo,
}

/// Runtime configuration for a [`crate::controller::ChatController`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Host resource name used to build endpoint URLs.
    pub resource_name: String,
    /// Storage key for the persisted panel position.
    pub position_key: String,
    /// Maximum number of rendered log entries.
    pub max_log_entries: usize,
    /// Eviction policy applied when the log exceeds `max_log_entries`.
    pub eviction: EvictionPolicy,
    /// Close animation length in milliseconds.
    pub close_delay_ms: u32,
    /// Delay before scrolling the log after an append, in milliseconds.
    pub scroll_delay_ms: u32,
    /// Counter lengths above this show a warning.
    pub counter_warning_above: usize,
    /// Counter lengths above this show danger.
    pub counter_danger_above: usize,
    /// Console log level for the browser build (`error`..`trace`).
    pub log_level: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            resource_name: RESOURCE_NAME.to_owned(),
            position_key: POSITION_STORAGE_KEY.to_owned(),
            max_log_entries: MAX_LOG_ENTRIES,
            eviction: EvictionPolicy::default(),
            close_delay_ms: CLOSE_DELAY_MS,
            scroll_delay_ms: SCROLL_DELAY_MS,
            counter_warning_above: COUNTER_WARNING_ABOVE,
            counter_danger_above: COUNTER_DANGER_ABOVE,
            log_level: "info".to_owned(),
        }
    }
}

impl ChatConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ConfigDecode`] if `raw` is not a JSON object with
    /// correctly typed fields.
    pub fn from_json(raw: &str) -> Result<Self, ChatError> {
        let config: Self = serde_json::from_str(raw).map_err(ChatError::ConfigDecode)?;
        Ok(config.normalized())
    }

    /// Parse an optional config, falling back to defaults on absence or error.
    #[must_use]
    pub fn from_json_or_default(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match Self::from_json(raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("using default chat config: {err}");
                Self::default()
            }
        }
    }

    /// Console log level, defaulting to `Info` when unparseable.
    #[must_use]
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Clamp fields into a usable range.
    fn normalized(mut self) -> Self {
        self.max_log_entries = self.max_log_entries.max(1);
        self.counter_danger_above = self.counter_danger_above.max(self.counter_warning_above);
        self
    }
}
