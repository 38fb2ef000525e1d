//! # proddash Core Library
//!
//! Core logic for the proddash focus timer: a repeating cycle of focus and
//! break intervals, counted down one second at a time. Front ends (the
//! `proddash` CLI, or anything else) supply the clock ticks and paint the
//! state; everything that decides what happens next lives here.
//!
//! ## Architecture
//!
//! - **Session Scheduler**: a pure, tick-driven state machine that returns
//!   events instead of performing side effects
//! - **Settings**: interval durations with permissive validation
//! - **Storage**: SQLite key-value blobs and TOML-based configuration
//! - **Session Controller**: owns one scheduler and reacts to its events by
//!   notifying, persisting and rendering
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: Core focus/break state machine
//! - [`SessionController`]: Scheduler plus its collaborators
//! - [`SettingsStore`]: Validated, persisted durations
//! - [`Database`]: Key-value persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod settings;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{Notifier, Renderer, Severity};
pub use session::SessionController;
pub use settings::{RawSettings, Settings, SettingsStore};
pub use storage::{Config, Database, KvStore, MemoryStore, StateStore};
pub use timer::{
    format_clock, Clock, IntervalType, ManualClock, PersistedState, SchedulerState,
    SessionScheduler, SystemClock,
};
