use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::timer::IntervalType;

/// Every scheduler state change produces an Event.
/// The session controller turns them into notifications, writes and renders;
/// the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        interval_type: IntervalType,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        interval_type: IntervalType,
        remaining_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A running countdown reached zero and the next interval is queued, idle.
    IntervalCompleted {
        completed: IntervalType,
        next: IntervalType,
        focus_intervals_completed: u32,
        current_cycle_number: u32,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: Settings,
        /// Whether the current interval was resized to the new duration.
        resized: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        interval_type: IntervalType,
        label: String,
        is_running: bool,
        remaining_seconds: u64,
        total_seconds: u64,
        remaining_display: String,
        progress: f64,
        focus_intervals_completed: u32,
        current_cycle_number: u32,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::IntervalCompleted {
            completed: IntervalType::Focus,
            next: IntervalType::LongBreak,
            focus_intervals_completed: 4,
            current_cycle_number: 4,
            at: DateTime::<Utc>::default(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "IntervalCompleted");
        assert_eq!(json["next"], "longBreak");
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
