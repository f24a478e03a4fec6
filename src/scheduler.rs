//! Fixed-timestep driver that decouples simulation ticks from frame rate.
//!
//! The host calls [`TickScheduler::advance`] once per frame with the wall
//! time since the previous frame. Whole tick intervals are run, the fraction
//! left over is carried to the next frame, and a long stall (window dragged,
//! laptop asleep) runs at most `max_catch_up_ticks` before the rest of the
//! backlog is dropped.

use tracing::debug;

use crate::config::ScheduleConfig;
use crate::world::World;

#[derive(Debug, Clone)]
pub struct TickScheduler {
    /// Seconds per tick.
    tick_interval: f64,
    max_catch_up_ticks: u32,
    /// Seconds not yet converted into ticks. Always below one interval
    /// between calls.
    accumulator: f64,
    /// Whole ticks discarded by the catch-up cap since construction.
    dropped_ticks: u64,
}

impl TickScheduler {
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            max_catch_up_ticks: config.max_catch_up_ticks,
            accumulator: 0.0,
            dropped_ticks: 0,
        }
    }

    /// Fold `elapsed_secs` into the accumulator and return how many ticks
    /// should run now. Never more than the catch-up cap.
    pub fn due_ticks(&mut self, elapsed_secs: f64) -> u32 {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            debug!("ignoring elapsed time {elapsed_secs}");
            return 0;
        }

        self.accumulator += elapsed_secs;
        let whole = (self.accumulator / self.tick_interval).floor();
        self.accumulator -= whole * self.tick_interval;
        // Rounding can leave the remainder a hair outside [0, interval).
        self.accumulator = self.accumulator.clamp(0.0, self.tick_interval);

        let cap = f64::from(self.max_catch_up_ticks);
        if whole > cap {
            let dropped = whole - cap;
            self.dropped_ticks = self.dropped_ticks.saturating_add(dropped as u64);
            debug!(
                "catch-up capped at {} ticks, dropped {} behind schedule",
                self.max_catch_up_ticks, dropped
            );
            self.max_catch_up_ticks
        } else {
            whole as u32
        }
    }

    /// Run the due ticks against `world`. Returns how many ran.
    pub fn advance(&mut self, elapsed_secs: f64, world: &mut World) -> u32 {
        let due = self.due_ticks(elapsed_secs);
        for _ in 0..due {
            world.advance_tick();
        }
        due
    }

    /// Time banked towards the next tick, in seconds.
    pub fn accumulated(&self) -> f64 {
        self.accumulator
    }

    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    pub fn tick_interval(&self) -> f64 {
        self.tick_interval
    }

    pub fn max_catch_up_ticks(&self) -> u32 {
        self.max_catch_up_ticks
    }

    /// Forget any banked time, e.g. after unpausing.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(rate: f64, cap: u32) -> TickScheduler {
        TickScheduler::new(&ScheduleConfig {
            tick_rate_hz: rate,
            max_catch_up_ticks: cap,
        })
    }

    #[test]
    fn long_stall_runs_at_most_the_cap() {
        let mut scheduler = scheduler(30.0, 5);
        let stall = 300.0 / 30.0 + 0.001;
        assert_eq!(scheduler.due_ticks(stall), 5);
        assert_eq!(scheduler.dropped_ticks(), 295);
        // The backlog is gone, not deferred.
        assert_eq!(scheduler.due_ticks(0.0), 0);
    }

    #[test]
    fn fractional_time_is_carried_forward() {
        let mut scheduler = scheduler(10.0, 5);
        assert_eq!(scheduler.due_ticks(0.06), 0);
        assert!((scheduler.accumulated() - 0.06).abs() < 1e-9);
        assert_eq!(scheduler.due_ticks(0.06), 1);
        assert!((scheduler.accumulated() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn steady_frames_converge_on_the_tick_rate() {
        let mut scheduler = scheduler(30.0, 5);
        let mut total = 0;
        // Ten seconds of 144 Hz frames.
        for _ in 0..1440 {
            total += scheduler.due_ticks(1.0 / 144.0);
        }
        assert!((299..=300).contains(&total), "ran {total} ticks");
        assert_eq!(scheduler.dropped_ticks(), 0);
    }

    #[test]
    fn nonsense_elapsed_values_are_ignored() {
        let mut scheduler = scheduler(30.0, 5);
        assert_eq!(scheduler.due_ticks(f64::NAN), 0);
        assert_eq!(scheduler.due_ticks(f64::INFINITY), 0);
        assert_eq!(scheduler.due_ticks(-1.0), 0);
        assert_eq!(scheduler.accumulated(), 0.0);
    }

    #[test]
    fn advance_drives_the_world() {
        let config = crate::SimConfig {
            seed: Some(5),
            ..crate::SimConfig::default()
        };
        let mut scheduler = TickScheduler::new(&config.schedule);
        let mut world = World::new(config).unwrap();

        let ran = scheduler.advance(scheduler.tick_interval() * 3.5, &mut world);
        assert_eq!(ran, 3);
        assert_eq!(world.tick(), 3);
    }
}
