//! Tick source abstraction.
//!
//! A clock only says whether ticks should currently be delivered and what
//! time it is. Delivering the ticks is the driver's job: the CLI polls a
//! one-second interval and forwards to `tick()` while the clock runs, tests
//! call `tick()` in a loop.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_running(&self) -> bool;
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone)]
pub struct SystemClock {
    running: bool,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock for tests. Time stands still at the construction
/// instant; start and stop calls are counted.
#[derive(Debug, Clone)]
pub struct ManualClock {
    running: bool,
    now: DateTime<Utc>,
    starts: u32,
    stops: u32,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            running: false,
            now,
            starts: 0,
            stops: 0,
        }
    }

    /// Number of `start` calls so far.
    pub fn starts(&self) -> u32 {
        self.starts
    }

    /// Number of `stop` calls so far.
    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Clock for ManualClock {
    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.running = false;
        self.stops += 1;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
