//! Character counter for the main input.
//!
//! Advisory only: nothing here caps the buffer. Length is measured in UTF-16
//! code units so the count matches what the browser reports for the input.

#[cfg(test)]
#[path = "counter_test.rs"]
mod counter_test;

/// Display level for the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterLevel {
    #[default]
    Neutral,
    Warning,
    Danger,
}

impl CounterLevel {
    /// Style class applied to the counter, if any.
    #[must_use]
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Self::Neutral => None,
            Self::Warning => Some("warning"),
            Self::Danger => Some("danger"),
        }
    }
}

/// Thresholds for [`CounterLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterThresholds {
    pub warning_above: usize,
    pub danger_above: usize,
}

impl CounterThresholds {
    #[must_use]
    pub fn level(self, count: usize) -> CounterLevel {
        if count > self.danger_above {
            CounterLevel::Danger
        } else if count > self.warning_above {
            CounterLevel::Warning
        } else {
            CounterLevel::Neutral
        }
    }
}

/// Length of `text` as the browser counts it.
#[must_use]
pub fn input_length(text: &str) -> usize {
    text.encode_utf16().count()
}
