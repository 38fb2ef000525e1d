use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One timed segment of the focus/break cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntervalType {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl IntervalType {
    pub fn is_break(self) -> bool {
        matches!(self, IntervalType::ShortBreak | IntervalType::LongBreak)
    }

    /// Wire name, as stored in the scheduler blob.
    pub fn as_str(self) -> &'static str {
        match self {
            IntervalType::Focus => "focus",
            IntervalType::ShortBreak => "shortBreak",
            IntervalType::LongBreak => "longBreak",
        }
    }

    /// Human-readable name used in announcements.
    pub fn label(self) -> &'static str {
        match self {
            IntervalType::Focus => "Focus",
            IntervalType::ShortBreak => "Short Break",
            IntervalType::LongBreak => "Long Break",
        }
    }

    /// Label with a leading glyph, for countdown displays.
    pub fn display_label(self) -> &'static str {
        match self {
            IntervalType::Focus => "🎯 Focus",
            IntervalType::ShortBreak => "☕ Short Break",
            IntervalType::LongBreak => "🏖️ Long Break",
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(IntervalType::Focus),
            "shortBreak" => Ok(IntervalType::ShortBreak),
            "longBreak" => Ok(IntervalType::LongBreak),
            other => Err(ValidationError::UnknownInterval(other.to_string())),
        }
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
