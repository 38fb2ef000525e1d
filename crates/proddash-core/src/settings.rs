//! Interval durations and their validation.
//!
//! Settings are permissive by policy: a value that is not a positive integer
//! never aborts a save, it is coerced to `1` instead. Loading is per field,
//! so one garbled field in the persisted blob only costs that field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StorageError;
use crate::storage::{KvStore, StateStore};
use crate::timer::IntervalType;

/// Storage key of the settings blob.
pub const SETTINGS_KEY: &str = "proddash.pomodoroSettings.v1";

const MIN_VALUE: u32 = 1;

/// Validated interval durations. Every field is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Completed focus intervals between long breaks.
    pub intervals_before_long: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            intervals_before_long: 4,
        }
    }
}

impl Settings {
    pub fn minutes(&self, interval: IntervalType) -> u32 {
        match interval {
            IntervalType::Focus => self.focus_minutes,
            IntervalType::ShortBreak => self.short_break_minutes,
            IntervalType::LongBreak => self.long_break_minutes,
        }
    }

    /// Length of `interval` in seconds.
    pub fn duration_secs(&self, interval: IntervalType) -> u64 {
        u64::from(self.minutes(interval)).saturating_mul(60)
    }

    /// Build settings from a persisted blob, falling back to the default
    /// for every field that is missing or not a positive integer.
    pub fn from_blob(blob: &Value) -> Self {
        let defaults = Self::default();
        let Some(obj) = blob.as_object() else {
            tracing::warn!("settings blob is not an object, using defaults");
            return defaults;
        };
        let field = |name: &str, fallback: u32| match obj.get(name) {
            None => fallback,
            Some(v) => positive_int(v).unwrap_or_else(|| {
                tracing::warn!(field = name, value = %v, "malformed persisted setting, using default");
                fallback
            }),
        };
        Self {
            focus_minutes: field("focusMinutes", defaults.focus_minutes),
            short_break_minutes: field("shortBreakMinutes", defaults.short_break_minutes),
            long_break_minutes: field("longBreakMinutes", defaults.long_break_minutes),
            intervals_before_long: field("intervalsBeforeLong", defaults.intervals_before_long),
        }
    }

    /// Overlay `raw` on top of `self`. Supplied fields that are not positive
    /// integers become `1`; absent fields keep their current value.
    pub fn merged(&self, raw: &RawSettings) -> Self {
        Self {
            focus_minutes: coerce("focusMinutes", raw.focus_minutes.as_ref(), self.focus_minutes),
            short_break_minutes: coerce(
                "shortBreakMinutes",
                raw.short_break_minutes.as_ref(),
                self.short_break_minutes,
            ),
            long_break_minutes: coerce(
                "longBreakMinutes",
                raw.long_break_minutes.as_ref(),
                self.long_break_minutes,
            ),
            intervals_before_long: coerce(
                "intervalsBeforeLong",
                raw.intervals_before_long.as_ref(),
                self.intervals_before_long,
            ),
        }
    }
}

/// Unvalidated settings input, as it arrives from a form field, a CLI flag
/// or a hand-edited blob. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_minutes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_break_minutes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervals_before_long: Option<Value>,
}

impl RawSettings {
    pub fn focus(mut self, value: impl Into<Value>) -> Self {
        self.focus_minutes = Some(value.into());
        self
    }

    pub fn short_break(mut self, value: impl Into<Value>) -> Self {
        self.short_break_minutes = Some(value.into());
        self
    }

    pub fn long_break(mut self, value: impl Into<Value>) -> Self {
        self.long_break_minutes = Some(value.into());
        self
    }

    pub fn intervals_before_long(mut self, value: impl Into<Value>) -> Self {
        self.intervals_before_long = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.focus_minutes.is_none()
            && self.short_break_minutes.is_none()
            && self.long_break_minutes.is_none()
            && self.intervals_before_long.is_none()
    }
}

impl From<Settings> for RawSettings {
    fn from(s: Settings) -> Self {
        Self::default()
            .focus(s.focus_minutes)
            .short_break(s.short_break_minutes)
            .long_break(s.long_break_minutes)
            .intervals_before_long(s.intervals_before_long)
    }
}

/// Holds the current settings and mirrors them to the key-value store.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    current: Settings,
}

impl SettingsStore {
    /// Merge the persisted blob (if any) over the compiled-in defaults.
    pub fn load<S: KvStore>(kv: &StateStore<S>) -> Self {
        let current = kv
            .fetch(SETTINGS_KEY)
            .map(|blob| Settings::from_blob(&blob))
            .unwrap_or_default();
        Self { current }
    }

    pub fn current(&self) -> &Settings {
        &self.current
    }

    pub fn duration_secs(&self, interval: IntervalType) -> u64 {
        self.current.duration_secs(interval)
    }

    /// Validate `raw`, keep the result in memory, then persist it.
    ///
    /// The in-memory settings are updated even when the write fails; the
    /// error is returned so the caller can surface it.
    pub fn save<S: KvStore>(
        &mut self,
        raw: &RawSettings,
        kv: &StateStore<S>,
    ) -> Result<Settings, StorageError> {
        self.current = self.current.merged(raw);
        kv.put(SETTINGS_KEY, &self.current)?;
        Ok(self.current)
    }

    /// Restore defaults and drop the persisted blob.
    pub fn reset<S: KvStore>(&mut self, kv: &StateStore<S>) -> Result<Settings, StorageError> {
        self.current = Settings::default();
        kv.remove(SETTINGS_KEY)?;
        Ok(self.current)
    }
}

/// Positive integer view of a JSON value. Floats are truncated and numeric
/// strings are parsed, matching what an HTML number field hands over.
fn positive_int(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64().filter(|f| f.is_finite())?;
                f.trunc() as i64
            }
        },
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n >= MIN_VALUE)
}

fn coerce(name: &str, raw: Option<&Value>, current: u32) -> u32 {
    match raw {
        None => current,
        Some(v) => positive_int(v).unwrap_or_else(|| {
            tracing::warn!(field = name, value = %v, "invalid setting coerced to {MIN_VALUE}");
            MIN_VALUE
        }),
    }
}
