use std::time::Duration;

use clap::Subcommand;
use proddash_core::Config;
use tokio::time::MissedTickBehavior;

use super::{open_session, print_event, Session};
use crate::terminal::CountdownRenderer;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the current interval and count it down until it completes
    /// (Ctrl-C pauses and exits)
    Run {
        /// Only print warnings and the final event
        #[arg(long)]
        quiet: bool,
    },
    /// Stop and return to the first focus interval
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Start and consume ticks immediately, without waiting
    Tick {
        /// Number of one-second ticks to deliver
        #[arg(long, default_value = "1")]
        count: u64,
    },
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run { quiet } => {
            let mut session = open_session(config, CountdownRenderer::live(config.ui.clone()), quiet);
            countdown(&mut session)?;
        }
        TimerAction::Reset => {
            let mut session = open_session(config, CountdownRenderer::inactive(), false);
            let event = session.reset();
            print_event(&event)?;
        }
        TimerAction::Status => {
            let session = open_session(config, CountdownRenderer::inactive(), true);
            print_event(&session.snapshot())?;
        }
        TimerAction::Tick { count } => {
            let mut session = open_session(config, CountdownRenderer::inactive(), true);
            session.start();
            for _ in 0..count {
                if let Some(event) = session.tick() {
                    print_event(&event)?;
                    break;
                }
            }
            print_event(&session.snapshot())?;
        }
    }
    Ok(())
}

/// Drive the session from a one-second interval until the current interval
/// completes or the user interrupts.
fn countdown(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        if session.start().is_none() {
            return Ok(());
        }

        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // A late tick is delivered late rather than doubled up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval fires immediately.
        interval.tick().await;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        while session.wants_ticks() {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(event) = session.tick() {
                        eprintln!();
                        print_event(&event)?;
                    }
                }
                _ = &mut ctrl_c => {
                    if let Some(event) = session.pause() {
                        eprintln!();
                        print_event(&event)?;
                    }
                    break;
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
