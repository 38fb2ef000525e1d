//! Terminal front end: stderr toasts and a single-line countdown.
//!
//! Everything here writes to stderr so stdout stays machine-readable JSON.

use std::io::{self, Write};

use proddash_core::storage::UiConfig;
use proddash_core::{Notifier, Renderer, SchedulerState, Severity};

const BAR_WIDTH: usize = 20;

pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for TerminalNotifier {
    fn toast(&mut self, message: &str, severity: Severity, _duration_ms: u64) {
        // Warnings always get through, even in quiet mode.
        if self.quiet && severity != Severity::Warning && severity != Severity::Error {
            return;
        }
        eprintln!("\n{} {message}", severity.icon());
    }

    fn announce(&mut self, message: &str) {
        tracing::info!(target: "proddash::announce", "{message}");
    }

    fn play_completion_sound(&mut self) {
        // Best effort: a closed stderr must not stop the session.
        ring_bell(&mut std::io::stderr()).ok();
    }
}

/// Redraws one status line in place. Inactive renderers draw nothing, which
/// is what the one-shot commands use.
pub struct CountdownRenderer {
    live: bool,
    ui: UiConfig,
}

impl CountdownRenderer {
    pub fn live(ui: UiConfig) -> Self {
        Self { live: true, ui }
    }

    pub fn inactive() -> Self {
        Self {
            live: false,
            ui: UiConfig::default(),
        }
    }

    pub fn line(&self, state: &SchedulerState) -> String {
        let label = if self.ui.glyphs {
            state.interval_type.display_label()
        } else {
            state.interval_type.label()
        };
        let mut line = format!("{label}  {}", state.remaining_display());
        if self.ui.show_progress {
            line.push_str(&format!("  {}", progress_bar(state.progress())));
        }
        line.push_str(&format!("  cycle {}", state.current_cycle_number));
        if !state.is_running {
            line.push_str("  (paused)");
        }
        line
    }
}

impl Renderer for CountdownRenderer {
    fn on_state_change(&mut self, state: &SchedulerState) {
        if !self.live {
            return;
        }
        // Best effort, like the bell.
        self.redraw(&mut std::io::stderr(), state).ok();
    }
}

impl CountdownRenderer {
    fn redraw(&self, out: &mut impl Write, state: &SchedulerState) -> io::Result<()> {
        // \x1b[2K clears the previous, possibly longer, line.
        write!(out, "\r\x1b[2K{}", self.line(state))?;
        out.flush()
    }
}

fn ring_bell(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\x07")?;
    out.flush()
}

fn progress_bar(progress: f64) -> String {
    let progress = progress.clamp(0.0, 1.0);
    let filled = (progress * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        (progress * 100.0).round() as u32
    )
}
