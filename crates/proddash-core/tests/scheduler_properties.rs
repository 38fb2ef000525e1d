//! Property tests for the focus/break cycle.

use chrono::{DateTime, Utc};
use proddash_core::{IntervalType, SessionScheduler, Settings};
use proptest::prelude::*;

fn at() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

fn short_settings(n: u32) -> Settings {
    Settings {
        focus_minutes: 1,
        short_break_minutes: 1,
        long_break_minutes: 1,
        intervals_before_long: n,
    }
}

fn finish(s: &mut SessionScheduler) {
    s.start(at());
    while s.tick(at()).is_none() {}
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Reset,
    Tick(u16),
    Apply(u32, u32, u32, u32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Pause),
        Just(Op::Reset),
        (1u16..200).prop_map(Op::Tick),
        (1u32..5, 1u32..5, 1u32..5, 1u32..6).prop_map(|(f, s, l, n)| Op::Apply(f, s, l, n)),
    ]
}

proptest! {
    #[test]
    fn nth_break_is_long(n in 1u32..8) {
        let mut s = SessionScheduler::new(short_settings(n));
        for i in 1..=n {
            finish(&mut s);
            let expected = if i == n { IntervalType::LongBreak } else { IntervalType::ShortBreak };
            prop_assert_eq!(s.interval_type(), expected);
            finish(&mut s);
        }
        prop_assert_eq!(s.state().focus_intervals_completed, n);
    }

    #[test]
    fn remaining_stays_within_interval(ops in prop::collection::vec(op(), 1..60)) {
        let mut s = SessionScheduler::new(short_settings(2));
        for op in ops {
            let focus_before = s.state().focus_intervals_completed;
            let cycle_before = s.state().current_cycle_number;
            let mut completed = false;
            let is_reset = matches!(op, Op::Reset);
            match op {
                Op::Start => { s.start(at()); }
                Op::Pause => { s.pause(at()); }
                Op::Reset => { s.reset(at()); }
                Op::Tick(k) => {
                    for _ in 0..k {
                        completed |= s.tick(at()).is_some();
                    }
                }
                Op::Apply(f, sb, l, n) => {
                    s.apply_settings(
                        Settings {
                            focus_minutes: f,
                            short_break_minutes: sb,
                            long_break_minutes: l,
                            intervals_before_long: n,
                        },
                        at(),
                    );
                }
            }
            let st = s.state();
            prop_assert!(st.remaining_seconds <= st.total_seconds);
            prop_assert!(st.total_seconds > 0);
            prop_assert!(st.current_cycle_number >= 1);
            prop_assert!(st.focus_intervals_completed >= focus_before);
            prop_assert!(st.focus_intervals_completed <= focus_before + 1);
            if !completed {
                prop_assert_eq!(st.focus_intervals_completed, focus_before);
                if !is_reset {
                    prop_assert_eq!(st.current_cycle_number, cycle_before);
                }
            }
            prop_assert!((0.0..=1.0).contains(&s.progress()));
        }
    }

    #[test]
    fn reset_is_idempotent(ticks in 0u32..400, start in any::<bool>()) {
        let mut s = SessionScheduler::new(short_settings(3));
        s.start(at());
        for _ in 0..ticks {
            s.tick(at());
        }
        if start {
            s.start(at());
        }
        s.reset(at());
        let once = s.clone();
        s.reset(at());
        prop_assert_eq!(s, once);
    }

    #[test]
    fn apply_settings_round_trips_when_idle(f in 1u32..500, sb in 1u32..60, l in 1u32..120, n in 1u32..10) {
        let mut s = SessionScheduler::default();
        let settings = Settings {
            focus_minutes: f,
            short_break_minutes: sb,
            long_break_minutes: l,
            intervals_before_long: n,
        };
        s.apply_settings(settings, at());
        prop_assert_eq!(s.duration_secs(IntervalType::Focus), u64::from(f) * 60);
        prop_assert_eq!(s.remaining_seconds(), u64::from(f) * 60);
    }
}
