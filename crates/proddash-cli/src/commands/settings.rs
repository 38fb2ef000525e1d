use clap::Subcommand;
use proddash_core::{Config, RawSettings};

use super::open_session;
use crate::terminal::CountdownRenderer;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current interval durations
    Show,
    /// Change one or more durations (invalid values become 1)
    Set {
        /// Focus interval, in minutes
        #[arg(long, allow_hyphen_values = true)]
        focus: Option<String>,
        /// Short break, in minutes
        #[arg(long, allow_hyphen_values = true)]
        short_break: Option<String>,
        /// Long break, in minutes
        #[arg(long, allow_hyphen_values = true)]
        long_break: Option<String>,
        /// Focus intervals before a long break
        #[arg(long, allow_hyphen_values = true)]
        intervals_before_long: Option<String>,
    },
    /// Restore the default durations
    Reset,
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config, CountdownRenderer::inactive(), true);

    match action {
        SettingsAction::Show => {}
        SettingsAction::Set {
            focus,
            short_break,
            long_break,
            intervals_before_long,
        } => {
            let raw = RawSettings {
                focus_minutes: focus.map(Into::into),
                short_break_minutes: short_break.map(Into::into),
                long_break_minutes: long_break.map(Into::into),
                intervals_before_long: intervals_before_long.map(Into::into),
            };
            if raw.is_empty() {
                return Err("nothing to set: pass at least one of --focus, --short-break, --long-break, --intervals-before-long".into());
            }
            session.apply_settings(&raw);
        }
        SettingsAction::Reset => {
            session.reset_settings();
        }
    }

    println!("{}", serde_json::to_string_pretty(session.settings())?);
    Ok(())
}
