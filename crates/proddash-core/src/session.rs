//! Session controller: the one scheduler instance and its collaborators.
//!
//! Commands go to the pure [`SessionScheduler`]; the events it returns are
//! turned into clock changes, notifications and storage writes here, and
//! the renderer is called after every mutation. Storage is a best-effort
//! mirror: a failed write is reported and otherwise ignored.

use crate::error::StorageError;
use crate::events::Event;
use crate::notify::{Notifier, Renderer, Severity};
use crate::settings::{RawSettings, Settings, SettingsStore};
use crate::storage::{KvStore, NotificationsConfig, StateStore};
use crate::timer::{Clock, PersistedState, SchedulerState, SessionScheduler, SCHEDULER_KEY};

const FOCUS_DONE: &str = "Focus session complete! Time for a break.";
const BREAK_DONE: &str = "Break complete! Ready for another focus session?";
const STORAGE_FULL: &str = "Storage full. Some data may not be saved.";
const STORAGE_FAILED: &str = "Could not save progress. Changes are kept for this session.";

pub struct SessionController<S, C, N, R> {
    scheduler: SessionScheduler,
    settings: SettingsStore,
    store: StateStore<S>,
    clock: C,
    notifier: N,
    renderer: R,
    prefs: NotificationsConfig,
}

impl<S, C, N, R> SessionController<S, C, N, R>
where
    S: KvStore,
    C: Clock,
    N: Notifier,
    R: Renderer,
{
    /// Load settings and scheduler counters from `store` and paint the
    /// initial state. Missing or malformed blobs fall back to defaults.
    pub fn new(store: S, clock: C, notifier: N, renderer: R, prefs: NotificationsConfig) -> Self {
        let store = StateStore::new(store);
        let settings = SettingsStore::load(&store);
        let persisted = store
            .fetch(SCHEDULER_KEY)
            .map(|blob| PersistedState::from_blob(&blob))
            .unwrap_or_default();
        let scheduler = SessionScheduler::restore(*settings.current(), persisted);
        tracing::debug!(?persisted, settings = ?settings.current(), "session restored");

        let mut controller = Self {
            scheduler,
            settings,
            store,
            clock,
            notifier,
            renderer,
            prefs,
        };
        controller.render();
        controller
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SchedulerState {
        self.scheduler.state()
    }

    pub fn scheduler(&self) -> &SessionScheduler {
        &self.scheduler
    }

    pub fn settings(&self) -> &Settings {
        self.settings.current()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn store(&self) -> &StateStore<S> {
        &self.store
    }

    /// Whether the driver should keep delivering ticks.
    pub fn wants_ticks(&self) -> bool {
        self.clock.is_running() && self.scheduler.is_running()
    }

    pub fn snapshot(&self) -> Event {
        self.scheduler.snapshot(self.clock.now())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.scheduler.start(self.clock.now())?;
        self.react(&event);
        self.render();
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.scheduler.pause(self.clock.now())?;
        self.react(&event);
        self.render();
        Some(event)
    }

    pub fn reset(&mut self) -> Event {
        let event = self.scheduler.reset(self.clock.now());
        self.react(&event);
        self.render();
        event
    }

    /// Deliver one clock tick. Returns the completion event, if any.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.scheduler.is_running() {
            return None;
        }
        let completed = self.scheduler.tick(self.clock.now());
        if let Some(event) = &completed {
            self.react(event);
        }
        self.render();
        completed
    }

    /// Validate, persist and apply new durations.
    ///
    /// The durations take effect even when the write fails; only the
    /// "Settings saved" confirmation is withheld.
    pub fn apply_settings(&mut self, raw: &RawSettings) -> Event {
        let saved = self.settings.save(raw, &self.store);
        self.push_settings(saved.map(|_| ()))
    }

    /// Go back to the compiled-in durations.
    pub fn reset_settings(&mut self) -> Event {
        let saved = self.settings.reset(&self.store);
        self.push_settings(saved.map(|_| ()))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn push_settings(&mut self, saved: Result<(), StorageError>) -> Event {
        let event = self
            .scheduler
            .apply_settings(*self.settings.current(), self.clock.now());
        match saved {
            Ok(()) => {
                self.notifier
                    .toast("Settings saved", Severity::Success, self.prefs.toast_duration_ms);
                self.announce("Settings saved");
            }
            Err(e) => self.report_storage_failure(&e),
        }
        self.render();
        event
    }

    fn react(&mut self, event: &Event) {
        match event {
            Event::TimerStarted { interval_type, .. } => {
                self.clock.start();
                self.announce(&format!("Timer started for {}", interval_type.label()));
            }
            Event::TimerPaused { .. } => {
                self.clock.stop();
                self.announce("Timer paused");
            }
            Event::TimerReset { .. } => {
                self.clock.stop();
                self.persist_state();
                self.announce("Timer reset");
            }
            Event::IntervalCompleted { completed, .. } => {
                self.clock.stop();
                if self.prefs.sound_enabled {
                    self.notifier.play_completion_sound();
                }
                let (toast, announcement) = if completed.is_break() {
                    (BREAK_DONE, "Break complete!")
                } else {
                    (FOCUS_DONE, "Focus session complete! Time for a break")
                };
                self.notifier
                    .toast(toast, Severity::Success, self.prefs.toast_duration_ms);
                self.announce(announcement);
                self.persist_state();
            }
            Event::SettingsApplied { .. } | Event::StateSnapshot { .. } => {}
        }
    }

    fn announce(&mut self, message: &str) {
        if self.prefs.announcements {
            self.notifier.announce(message);
        }
    }

    fn render(&mut self) {
        self.renderer.on_state_change(self.scheduler.state());
    }

    fn persist_state(&mut self) {
        if let Err(e) = self.store.put(SCHEDULER_KEY, &self.scheduler.persisted()) {
            self.report_storage_failure(&e);
        }
    }

    fn report_storage_failure(&mut self, err: &StorageError) {
        tracing::warn!(error = %err, "persisting state failed, keeping in-memory state");
        let message = match err {
            StorageError::Full => STORAGE_FULL,
            _ => STORAGE_FAILED,
        };
        self.notifier
            .toast(message, Severity::Warning, self.prefs.toast_duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::timer::{IntervalType, ManualClock};

    #[derive(Default)]
    struct Calls {
        toasts: Vec<(String, Severity)>,
        announcements: Vec<String>,
        sounds: u32,
    }

    impl Notifier for Calls {
        fn toast(&mut self, message: &str, severity: Severity, _duration_ms: u64) {
            self.toasts.push((message.to_string(), severity));
        }
        fn announce(&mut self, message: &str) {
            self.announcements.push(message.to_string());
        }
        fn play_completion_sound(&mut self) {
            self.sounds += 1;
        }
    }

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn on_state_change(&mut self, _state: &SchedulerState) {}
    }

    type Controller = SessionController<MemoryStore, ManualClock, Calls, NullRenderer>;

    fn controller(store: MemoryStore, prefs: NotificationsConfig) -> Controller {
        SessionController::new(
            store,
            ManualClock::default(),
            Calls::default(),
            NullRenderer,
            prefs,
        )
    }

    fn one_minute() -> RawSettings {
        RawSettings::default()
            .focus(1)
            .short_break(1)
            .long_break(1)
            .intervals_before_long(2)
    }

    #[test]
    fn start_starts_clock_and_announces() {
        let mut c = controller(MemoryStore::new(), NotificationsConfig::default());
        assert!(c.start().is_some());
        assert!(c.clock().is_running());
        assert!(c.wants_ticks());
        assert_eq!(
            c.notifier().announcements.last().map(String::as_str),
            Some("Timer started for Focus")
        );
        assert!(c.start().is_none());
        assert_eq!(c.clock().starts(), 1);
    }

    #[test]
    fn pause_while_idle_is_silent() {
        let mut c = controller(MemoryStore::new(), NotificationsConfig::default());
        let before = c.state().clone();
        assert!(c.pause().is_none());
        assert_eq!(c.state(), &before);
        assert!(c.notifier().announcements.is_empty());
        assert!(c.notifier().toasts.is_empty());
        assert_eq!(c.clock().stops(), 0);
    }

    #[test]
    fn completion_stops_clock_notifies_and_persists() {
        let mut c = controller(MemoryStore::new(), NotificationsConfig::default());
        c.apply_settings(&one_minute());
        c.start();
        let mut completed = None;
        for _ in 0..60 {
            completed = c.tick().or(completed);
        }
        assert!(matches!(completed, Some(Event::IntervalCompleted { .. })));
        assert!(!c.clock().is_running());
        assert_eq!(c.notifier().sounds, 1);
        assert!(c
            .notifier()
            .toasts
            .iter()
            .any(|(m, s)| m == FOCUS_DONE && *s == Severity::Success));

        let blob = c.store().fetch(SCHEDULER_KEY).unwrap();
        assert_eq!(blob["intervalType"], "shortBreak");
        assert_eq!(blob["focusIntervalsCompleted"], 1);
    }

    #[test]
    fn sound_can_be_disabled() {
        let prefs = NotificationsConfig {
            sound_enabled: false,
            ..NotificationsConfig::default()
        };
        let mut c = controller(MemoryStore::new(), prefs);
        c.apply_settings(&one_minute());
        c.start();
        for _ in 0..60 {
            c.tick();
        }
        assert_eq!(c.notifier().sounds, 0);
    }

    #[test]
    fn write_failure_keeps_memory_and_warns() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let mut c = controller(store, NotificationsConfig::default());
        c.apply_settings(&one_minute());
        assert_eq!(c.settings().focus_minutes, 1);
        assert_eq!(c.state().remaining_seconds, 60);
        assert!(c
            .notifier()
            .toasts
            .iter()
            .any(|(m, s)| m == STORAGE_FULL && *s == Severity::Warning));
        assert!(!c.notifier().toasts.iter().any(|(m, _)| m == "Settings saved"));
        assert!(!c.notifier().announcements.iter().any(|m| m == "Settings saved"));

        c.start();
        for _ in 0..60 {
            c.tick();
        }
        assert_eq!(c.state().interval_type, IntervalType::ShortBreak);
        assert_eq!(c.state().focus_intervals_completed, 1);
    }

    #[test]
    fn reload_restores_counters_not_countdown() {
        let store = MemoryStore::new();
        let mut c = controller(store, NotificationsConfig::default());
        c.apply_settings(&one_minute());
        c.start();
        for _ in 0..60 {
            c.tick();
        }
        c.start();
        for _ in 0..10 {
            c.tick();
        }

        let SessionController { store, .. } = c;
        let reloaded = SessionController::new(
            store.into_inner(),
            ManualClock::default(),
            Calls::default(),
            NullRenderer,
            NotificationsConfig::default(),
        );
        let st = reloaded.state();
        assert_eq!(st.interval_type, IntervalType::ShortBreak);
        assert_eq!(st.remaining_seconds, 60);
        assert!(!st.is_running);
        assert_eq!(st.focus_intervals_completed, 1);
    }

    #[test]
    fn announcements_can_be_muted() {
        let prefs = NotificationsConfig {
            announcements: false,
            ..NotificationsConfig::default()
        };
        let mut c = controller(MemoryStore::new(), prefs);
        c.start();
        c.pause();
        c.reset();
        assert!(c.notifier().announcements.is_empty());
    }
}
