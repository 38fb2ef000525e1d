mod clock;
mod engine;
mod interval;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{PersistedState, SchedulerState, SessionScheduler, SCHEDULER_KEY};
pub use interval::{format_clock, IntervalType};
