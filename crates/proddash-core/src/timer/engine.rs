//! Session scheduler implementation.
//!
//! The scheduler is a tick-driven state machine with no I/O of its own.
//! The caller delivers one `tick()` per second while the scheduler runs and
//! reacts to the returned events (notify, persist, render).
//!
//! ## State Transitions
//!
//! Two independent axes:
//!
//! ```text
//! run:      Idle <-> Running            (start / pause, reset forces Idle)
//! interval: Focus -> ShortBreak|LongBreak -> Focus -> ...
//!                                       (completion only, reset forces Focus)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut scheduler = SessionScheduler::new(Settings::default());
//! scheduler.start(Utc::now());
//! // Once per second:
//! scheduler.tick(Utc::now()); // Returns Some(Event) when an interval completes
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::interval::{format_clock, IntervalType};
use crate::events::Event;
use crate::settings::Settings;

/// Storage key of the scheduler blob.
pub const SCHEDULER_KEY: &str = "proddash.pomodoro.v1";

/// Everything a renderer needs to paint the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerState {
    pub interval_type: IntervalType,
    pub remaining_seconds: u64,
    /// Length of the interval being counted down. Fixed when the interval
    /// begins, so a settings change mid-run does not resize it.
    pub total_seconds: u64,
    pub is_running: bool,
    pub focus_intervals_completed: u32,
    pub current_cycle_number: u32,
}

impl SchedulerState {
    /// Fraction of the current interval already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_seconds as f64 / self.total_seconds as f64).clamp(0.0, 1.0)
    }

    pub fn remaining_display(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

/// The part of [`SchedulerState`] that survives a reload.
///
/// Remaining time and the run flag are deliberately left out: a reload
/// restarts the persisted interval at full length, idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub interval_type: IntervalType,
    pub current_cycle_number: u32,
    pub focus_intervals_completed: u32,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            interval_type: IntervalType::Focus,
            current_cycle_number: 1,
            focus_intervals_completed: 0,
        }
    }
}

impl PersistedState {
    /// Read a persisted blob field by field; anything missing or malformed
    /// keeps its default.
    pub fn from_blob(blob: &Value) -> Self {
        let defaults = Self::default();
        let Some(obj) = blob.as_object() else {
            tracing::warn!("scheduler blob is not an object, using defaults");
            return defaults;
        };

        let interval_type = obj
            .get("intervalType")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<IntervalType>().ok())
            .unwrap_or(defaults.interval_type);
        let current_cycle_number = obj
            .get("currentCycleNumber")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
            .unwrap_or(defaults.current_cycle_number);
        let focus_intervals_completed = obj
            .get("focusIntervalsCompleted")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(defaults.focus_intervals_completed);

        Self {
            interval_type,
            current_cycle_number,
            focus_intervals_completed,
        }
    }
}

/// Focus/break cycle state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionScheduler {
    settings: Settings,
    state: SchedulerState,
}

impl SessionScheduler {
    /// Fresh scheduler: idle, on a full focus interval, counters at rest.
    pub fn new(settings: Settings) -> Self {
        Self::restore(settings, PersistedState::default())
    }

    /// Rebuild from persisted counters. The interval restarts at full length.
    pub fn restore(settings: Settings, persisted: PersistedState) -> Self {
        let total = settings.duration_secs(persisted.interval_type);
        Self {
            settings,
            state: SchedulerState {
                interval_type: persisted.interval_type,
                remaining_seconds: total,
                total_seconds: total,
                is_running: false,
                focus_intervals_completed: persisted.focus_intervals_completed,
                current_cycle_number: persisted.current_cycle_number.max(1),
            },
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn interval_type(&self) -> IntervalType {
        self.state.interval_type
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    pub fn duration_secs(&self, interval: IntervalType) -> u64 {
        self.settings.duration_secs(interval)
    }

    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            interval_type: self.state.interval_type,
            current_cycle_number: self.state.current_cycle_number,
            focus_intervals_completed: self.state.focus_intervals_completed,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, at: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            interval_type: self.state.interval_type,
            label: self.state.interval_type.label().to_string(),
            is_running: self.state.is_running,
            remaining_seconds: self.state.remaining_seconds,
            total_seconds: self.state.total_seconds,
            remaining_display: self.state.remaining_display(),
            progress: self.progress(),
            focus_intervals_completed: self.state.focus_intervals_completed,
            current_cycle_number: self.state.current_cycle_number,
            at,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        self.state.is_running = true;
        tracing::debug!(interval = %self.state.interval_type, remaining = self.state.remaining_seconds, "timer started");
        Some(Event::TimerStarted {
            interval_type: self.state.interval_type,
            remaining_seconds: self.state.remaining_seconds,
            at,
        })
    }

    pub fn pause(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        tracing::debug!(remaining = self.state.remaining_seconds, "timer paused");
        Some(Event::TimerPaused {
            interval_type: self.state.interval_type,
            remaining_seconds: self.state.remaining_seconds,
            at,
        })
    }

    /// Stop, go back to a full focus interval and restart the cycle count.
    /// The historical focus total is kept.
    pub fn reset(&mut self, at: DateTime<Utc>) -> Event {
        let total = self.settings.duration_secs(IntervalType::Focus);
        self.state.is_running = false;
        self.state.interval_type = IntervalType::Focus;
        self.state.current_cycle_number = 1;
        self.state.remaining_seconds = total;
        self.state.total_seconds = total;
        tracing::debug!("timer reset");
        Event::TimerReset { at }
    }

    /// Consume one second. Returns `Some(Event::IntervalCompleted)` when the
    /// countdown reaches zero. Ignored while idle.
    pub fn tick(&mut self, at: DateTime<Utc>) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds == 0 {
            return Some(self.complete(at));
        }
        None
    }

    /// Swap in new durations. An idle interval is resized to the new length
    /// (dropping partial progress); a running one keeps its length and the
    /// change applies from the next interval.
    pub fn apply_settings(&mut self, settings: Settings, at: DateTime<Utc>) -> Event {
        self.settings = settings;
        let resized = !self.state.is_running;
        if resized {
            let total = self.settings.duration_secs(self.state.interval_type);
            self.state.remaining_seconds = total;
            self.state.total_seconds = total;
        }
        Event::SettingsApplied {
            settings,
            resized,
            at,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, at: DateTime<Utc>) -> Event {
        let completed = self.state.interval_type;
        self.state.is_running = false;

        let next = if completed == IntervalType::Focus {
            self.state.focus_intervals_completed =
                self.state.focus_intervals_completed.saturating_add(1);
            let every = self.settings.intervals_before_long.max(1);
            if self.state.focus_intervals_completed % every == 0 {
                IntervalType::LongBreak
            } else {
                IntervalType::ShortBreak
            }
        } else {
            self.state.current_cycle_number = self.state.current_cycle_number.saturating_add(1);
            IntervalType::Focus
        };

        let total = self.settings.duration_secs(next);
        self.state.interval_type = next;
        self.state.remaining_seconds = total;
        self.state.total_seconds = total;

        tracing::info!(
            completed = %completed,
            next = %next,
            focus_completed = self.state.focus_intervals_completed,
            cycle = self.state.current_cycle_number,
            "interval completed"
        );

        Event::IntervalCompleted {
            completed,
            next,
            focus_intervals_completed: self.state.focus_intervals_completed,
            current_cycle_number: self.state.current_cycle_number,
            at,
        }
    }
}

impl Default for SessionScheduler {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
