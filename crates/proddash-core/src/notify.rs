//! Outbound collaborator seams: notifications and rendering.
//!
//! The scheduler never calls these directly. The session controller reacts
//! to scheduler events and forwards them here, so the state machine can be
//! tested without any front end attached.

use serde::{Deserialize, Serialize};

use crate::timer::SchedulerState;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Error => "✗",
            Severity::Warning => "⚠",
            Severity::Info => "ℹ",
        }
    }
}

/// User-facing notifications.
pub trait Notifier {
    /// Short-lived visual message.
    fn toast(&mut self, message: &str, severity: Severity, duration_ms: u64);

    /// Screen-reader style announcement.
    fn announce(&mut self, message: &str);

    /// Audible cue at the end of an interval.
    fn play_completion_sound(&mut self);
}

/// Paints scheduler state. Called after every mutation.
pub trait Renderer {
    fn on_state_change(&mut self, state: &SchedulerState);
}
