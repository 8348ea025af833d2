//! Periodic tick scheduler.
//!
//! The main loop runs two independent triggers against one monotonic
//! millisecond clock: a fast sensor refresh and a slower control tick.
//! Each fires once `now > last + interval` and then restarts from `now`,
//! so a late poll delays the next tick instead of bunching ticks up.
//!
//! ```text
//!  clock ──▶ TickScheduler::poll(now) ──▶ [Sensor] [Control] ──▶ event queue
//! ```

use heapless::Vec;

use crate::config::CookerConfig;

/// Which periodic trigger fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Sensor,
    Control,
}

/// Ticks due from one [`TickScheduler::poll`], sensor first.
pub type DueTicks = Vec<Tick, 2>;

#[derive(Debug, Clone, Copy)]
struct Trigger {
    interval_ms: u64,
    last_ms: u64,
}

impl Trigger {
    const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms as u64,
            last_ms: 0,
        }
    }

    fn fire(&mut self, now_ms: u64) -> bool {
        if now_ms > self.last_ms.saturating_add(self.interval_ms) {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

pub struct TickScheduler {
    sensor: Trigger,
    control: Trigger,
}

impl TickScheduler {
    pub fn new(config: &CookerConfig) -> Self {
        Self {
            sensor: Trigger::new(config.sensor_interval_ms),
            control: Trigger::new(config.control_interval_ms),
        }
    }

    /// Collect the ticks due at `now_ms`.
    ///
    /// The sensor tick is listed first so a control tick on the same poll
    /// sees the sample it just took.
    pub fn poll(&mut self, now_ms: u64) -> DueTicks {
        let mut due = DueTicks::new();
        // Capacity matches the number of triggers; pushes cannot fail.
        if self.sensor.fire(now_ms) {
            let _ = due.push(Tick::Sensor);
        }
        if self.control.fire(now_ms) {
            let _ = due.push(Tick::Control);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> TickScheduler {
        TickScheduler::new(&CookerConfig::default())
    }

    #[test]
    fn nothing_due_at_boot() {
        let mut s = scheduler();
        assert!(s.poll(0).is_empty());
        assert!(s.poll(100).is_empty());
    }

    #[test]
    fn fires_strictly_after_interval() {
        let mut s = scheduler();
        assert_eq!(s.poll(101).as_slice(), [Tick::Sensor]);
        assert!(s.poll(201).is_empty());
        assert_eq!(s.poll(202).as_slice(), [Tick::Sensor]);
    }

    #[test]
    fn control_tick_follows_sensor_tick() {
        let mut s = scheduler();
        assert_eq!(s.poll(501).as_slice(), [Tick::Sensor, Tick::Control]);
        assert!(s.poll(501).is_empty());
        assert_eq!(s.poll(1002).as_slice(), [Tick::Sensor, Tick::Control]);
    }

    #[test]
    fn late_poll_does_not_bunch_ticks() {
        let mut s = scheduler();
        assert_eq!(s.poll(5_000).as_slice(), [Tick::Sensor, Tick::Control]);
        assert!(s.poll(5_050).is_empty());
    }
}
