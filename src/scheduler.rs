//! Burst scheduling on the engine's virtual clock.
//!
//! The clock advances by a fixed 16-unit step per tick, decoupled from real
//! frame timing. A burst is the window `[next_glitch_time, next_glitch_time
//! + glitch_duration]`, inclusive at both ends. When the clock passes the end
//! of the window, the scheduler closes it out exactly once (tracked by a
//! sentinel holding the closed window's start) and computes the next one.

use rand::Rng;

use crate::config::RandomRange;

/// Virtual-time units added per tick.
pub const TICK_STEP: f64 = 16.0;

/// Burst duration in fixed-timing mode.
const FIXED_DURATION: f64 = 200.0;

/// How the next burst window is derived from the current virtual time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timing {
    /// Interval and duration drawn uniformly from the configured bounds.
    Randomized(RandomRange),
    /// Constant interval, constant 200-unit duration.
    Fixed { frequency: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurstScheduler {
    next_glitch_time: f64,
    glitch_duration: f64,
    /// Start of the most recently closed-out window; guards against
    /// rescheduling the same window twice.
    current_glitch_end: f64,
}

impl BurstScheduler {
    pub fn new() -> Self {
        Self {
            next_glitch_time: 0.0,
            glitch_duration: 0.0,
            current_glitch_end: 0.0,
        }
    }

    /// Compute the next burst window relative to the current virtual time.
    pub fn schedule_next<R: Rng>(&mut self, clock: f64, timing: Timing, rng: &mut R) {
        match timing {
            Timing::Randomized(range) => {
                let interval = range.frequency_min
                    + rng.gen::<f64>() * (range.frequency_max - range.frequency_min);
                self.next_glitch_time = clock + interval;
                self.glitch_duration = range.duration_min
                    + rng.gen::<f64>() * (range.duration_max - range.duration_min);
            }
            Timing::Fixed { frequency } => {
                self.next_glitch_time = clock + frequency;
                self.glitch_duration = FIXED_DURATION;
            }
        }
    }

    /// Whether `clock` lies inside the current burst window (inclusive).
    pub fn in_burst(&self, clock: f64) -> bool {
        clock >= self.next_glitch_time && clock <= self.next_glitch_time + self.glitch_duration
    }

    /// Close out the current window and schedule the next one, if the clock
    /// has passed the window's end and it was not already closed. Returns
    /// whether a reschedule happened.
    pub fn close_out_if_past<R: Rng>(&mut self, clock: f64, timing: Timing, rng: &mut R) -> bool {
        if clock > self.next_glitch_time + self.glitch_duration
            && self.current_glitch_end != self.next_glitch_time
        {
            self.current_glitch_end = self.next_glitch_time;
            self.schedule_next(clock, timing, rng);
            return true;
        }
        false
    }

    pub fn window_start(&self) -> f64 {
        self.next_glitch_time
    }

    pub fn window_end(&self) -> f64 {
        self.next_glitch_time + self.glitch_duration
    }
}

impl Default for BurstScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn fixed(frequency: f64) -> Timing {
        Timing::Fixed { frequency }
    }

    #[test]
    fn burst_window_is_inclusive_at_both_ends() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut sched = BurstScheduler::new();
        sched.schedule_next(0.0, fixed(1000.0), &mut rng);

        assert!(!sched.in_burst(999.9));
        assert!(sched.in_burst(1000.0));
        assert!(sched.in_burst(1100.0));
        assert!(sched.in_burst(1200.0));
        assert!(!sched.in_burst(1200.1));
    }

    #[test]
    fn closes_out_each_window_exactly_once() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut sched = BurstScheduler::new();
        sched.schedule_next(0.0, fixed(1000.0), &mut rng);

        assert!(!sched.close_out_if_past(1200.0, fixed(1000.0), &mut rng));
        assert!(sched.close_out_if_past(1216.0, fixed(1000.0), &mut rng));
        // the new window starts strictly after the previous one ended
        assert_eq!(sched.window_start(), 2216.0);
        // subsequent ticks before the new window closes must not reschedule
        assert!(!sched.close_out_if_past(1232.0, fixed(1000.0), &mut rng));
        assert!(!sched.close_out_if_past(2216.0, fixed(1000.0), &mut rng));
    }

    #[test]
    fn randomized_windows_stay_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let range = RandomRange {
            frequency_min: 500.0,
            frequency_max: 2000.0,
            duration_min: 200.0,
            duration_max: 800.0,
        };
        let mut sched = BurstScheduler::new();
        for _ in 0..100 {
            let clock = sched.window_end() + TICK_STEP;
            sched.schedule_next(clock, Timing::Randomized(range), &mut rng);
            let interval = sched.window_start() - clock;
            let duration = sched.window_end() - sched.window_start();
            assert!((500.0..=2000.0).contains(&interval), "interval {interval}");
            assert!((200.0..=800.0).contains(&duration), "duration {duration}");
        }
    }
}
