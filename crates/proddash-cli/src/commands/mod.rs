pub mod config;
pub mod settings;
pub mod timer;

use proddash_core::{
    Config, Database, Event, KvStore, MemoryStore, SessionController, Severity, SystemClock,
};

use crate::terminal::{CountdownRenderer, TerminalNotifier};

pub type Session =
    SessionController<Box<dyn KvStore>, SystemClock, TerminalNotifier, CountdownRenderer>;

/// Build the one session controller for this process.
///
/// If the database cannot be opened the session still runs, backed by
/// memory only, and the user is warned that nothing will be saved.
pub fn open_session(config: &Config, renderer: CountdownRenderer, quiet: bool) -> Session {
    let mut notifier = TerminalNotifier::new(quiet);
    let store: Box<dyn KvStore> = match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable, progress will not be saved");
            proddash_core::Notifier::toast(
                &mut notifier,
                "Storage unavailable. Progress will not be saved.",
                Severity::Warning,
                config.notifications.toast_duration_ms,
            );
            Box::new(MemoryStore::new())
        }
    };
    SessionController::new(
        store,
        SystemClock::new(),
        notifier,
        renderer,
        config.notifications.clone(),
    )
}

pub fn print_event(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}
