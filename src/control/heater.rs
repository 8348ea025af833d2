//! Adaptive bang-bang heater controller.
//!
//! The active program declares a target band every control tick with
//! [`Heater::modulate`]; [`Heater::step`] then decides whether the element
//! runs.  A heating burst is sized from the learned thermal mass so the
//! lagging bottom sensor lands near the top of the band, and every burst is
//! followed by a fixed cool-down to limit relay wear.
//!
//! ```text
//!            bottom < min && idle
//!   ┌──────┐ ──────────────────▶ ┌──────────────────┐
//!   │ Idle │                     │ Heating{remain}  │
//!   └──────┘ ◀──┐                └──────────────────┘
//!               │ wait == 0          │ bottom >= max || remain expired
//!               │                    ▼
//!            ┌───────────────────────────┐
//!            │ CoolingDown{wait}         │ ◀── bottom >= max (re-armed)
//!            └───────────────────────────┘
//! ```

use log::{debug, info, warn};

use super::thermal_mass;
use crate::config::CookerConfig;

/// Sentinel value of an expired heating commitment.
const REMAIN_EXPIRED_MS: u32 = 1;

/// Bookkeeping state of the bang-bang cycle.
///
/// `power` is tracked separately: programs may force the element on
/// outside of a committed burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterPhase {
    /// No commitment and no pending cool-down.
    Idle,
    /// A heating burst is committed for `remain_ms` more milliseconds.
    /// Decays to 1, never 0; 1 means the burst has run out.
    Heating { remain_ms: u32 },
    /// Mandatory off-time before the next burst.
    CoolingDown { wait_ms: u32 },
}

impl HeaterPhase {
    pub fn power_remain_ms(self) -> u32 {
        match self {
            Self::Heating { remain_ms } => remain_ms,
            _ => 0,
        }
    }

    pub fn power_wait_remain_ms(self) -> u32 {
        match self {
            Self::CoolingDown { wait_ms } => wait_ms,
            _ => 0,
        }
    }
}

/// Tunables copied out of [`CookerConfig`] at construction.
#[derive(Debug, Clone, Copy)]
struct HeaterLimits {
    cooldown_ms: u32,
    initial_thermal_mass: i32,
    thermal_mass_min: i32,
    thermal_mass_max: i32,
    preserve_thermal_mass: bool,
}

/// The thermal controller.
pub struct Heater {
    power: bool,
    phase: HeaterPhase,

    min_target: u8,
    max_target: u8,

    last_tick_ms: u64,

    top_c: u8,
    bottom_c: u8,
    /// High-water mark of `bottom_c` since the last burst started.
    max_c: u8,

    // Previous burst, evaluated when the next one starts.
    last_max_target: u8,
    last_min_c: u8,
    last_power_ms: i32,

    /// Estimate of ms of heating needed to raise `bottom_c` by 1 °C.
    thermal_mass: i32,
    just_reset: bool,

    limits: HeaterLimits,
}

impl Heater {
    pub fn new(config: &CookerConfig) -> Self {
        let limits = HeaterLimits {
            cooldown_ms: config.relay_cooldown_ms,
            initial_thermal_mass: config.initial_thermal_mass_ms_per_c,
            thermal_mass_min: config.thermal_mass_min,
            thermal_mass_max: config.thermal_mass_max,
            preserve_thermal_mass: config.preserve_thermal_mass_on_reset,
        };
        Self {
            power: false,
            phase: HeaterPhase::Idle,
            min_target: 0,
            max_target: 0,
            last_tick_ms: 0,
            top_c: 0,
            bottom_c: 0,
            max_c: 0,
            last_max_target: 0,
            last_min_c: 0,
            last_power_ms: 0,
            thermal_mass: limits.initial_thermal_mass,
            just_reset: true,
            limits,
        }
    }

    // ── Control surface ───────────────────────────────────────

    pub fn power_on(&mut self) {
        if !self.power {
            info!("Heater power: on");
            self.power = true;
        }
    }

    pub fn power_off(&mut self) {
        if self.power {
            info!("Heater power: off");
            self.power = false;
        }
    }

    /// Declare the desired band `target ± hysteresis`.
    ///
    /// The arithmetic wraps on `u8`: a hysteresis larger than the target
    /// yields a huge `min_target`.  That case is reported, not corrected.
    pub fn modulate(&mut self, target_c: u8, hysteresis_c: u8) {
        let max_target = target_c.wrapping_add(hysteresis_c);
        let min_target = target_c.wrapping_sub(hysteresis_c);

        if (hysteresis_c > target_c || max_target < target_c)
            && (min_target, max_target) != (self.min_target, self.max_target)
        {
            warn!(
                "Heater band wraps: target {}\u{00b0}C \u{00b1}{} -> [{}, {}]",
                target_c, hysteresis_c, min_target, max_target
            );
        }

        self.max_target = max_target;
        self.min_target = min_target;
    }

    /// Record the latest sensor readings.
    pub fn ingest(&mut self, top_c: u8, bottom_c: u8) {
        self.top_c = top_c;
        self.bottom_c = bottom_c;
        self.max_c = self.max_c.max(bottom_c);
    }

    /// Run one bang-bang decision at monotonic time `now_ms`.
    pub fn step(&mut self, now_ms: u64) {
        let elapsed = u32::try_from(now_ms.saturating_sub(self.last_tick_ms)).unwrap_or(u32::MAX);
        self.last_tick_ms = now_ms;

        self.phase = match self.phase {
            HeaterPhase::Heating { remain_ms } => HeaterPhase::Heating {
                remain_ms: remain_ms.saturating_sub(elapsed).max(REMAIN_EXPIRED_MS),
            },
            HeaterPhase::CoolingDown { wait_ms } => match wait_ms.saturating_sub(elapsed) {
                0 => HeaterPhase::Idle,
                wait_ms => HeaterPhase::CoolingDown { wait_ms },
            },
            HeaterPhase::Idle => HeaterPhase::Idle,
        };

        let expired = self.phase == HeaterPhase::Heating { remain_ms: REMAIN_EXPIRED_MS };

        if self.bottom_c < self.min_target && self.phase == HeaterPhase::Idle {
            self.start_burst();
        } else if self.bottom_c >= self.max_target || expired {
            self.power_off();
            self.phase = HeaterPhase::CoolingDown {
                wait_ms: self.limits.cooldown_ms,
            };
        } else {
            // Inside the band with a commitment or cool-down pending: hold.
            debug!(
                "Heater hold: power remaining {} ms, power waiting {} ms, thermal mass {} ms/\u{00b0}C",
                self.phase.power_remain_ms(),
                self.phase.power_wait_remain_ms(),
                self.thermal_mass
            );
        }
    }

    /// Force power off and clear per-cycle bookkeeping.
    pub fn reset(&mut self) {
        self.power_off();
        self.phase = HeaterPhase::Idle;
        self.just_reset = true;

        self.min_target = 0;
        self.max_target = 0;
        self.last_tick_ms = 0;

        self.max_c = 0;
        self.last_max_target = 0;
        self.last_min_c = 0;
        self.last_power_ms = 0;

        if !self.limits.preserve_thermal_mass {
            self.thermal_mass = self.limits.initial_thermal_mass;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn power(&self) -> bool {
        self.power
    }

    pub fn phase(&self) -> HeaterPhase {
        self.phase
    }

    pub fn top_temperature(&self) -> u8 {
        self.top_c
    }

    pub fn bottom_temperature(&self) -> u8 {
        self.bottom_c
    }

    pub fn max_temperature(&self) -> u8 {
        self.max_c
    }

    pub fn min_target(&self) -> u8 {
        self.min_target
    }

    pub fn max_target(&self) -> u8 {
        self.max_target
    }

    pub fn power_remain_ms(&self) -> u32 {
        self.phase.power_remain_ms()
    }

    pub fn power_wait_remain_ms(&self) -> u32 {
        self.phase.power_wait_remain_ms()
    }

    pub fn thermal_mass(&self) -> i32 {
        self.thermal_mass
    }

    pub fn last_power_ms(&self) -> i32 {
        self.last_power_ms
    }

    // ── Internal ──────────────────────────────────────────────

    fn start_burst(&mut self) {
        self.power_on();

        let range = i32::from(self.max_c) - i32::from(self.last_min_c);
        let time_needed = thermal_mass::time_needed(self.last_power_ms, range);
        let diff = thermal_mass::target_diff(self.last_max_target, self.max_c);
        let error = time_needed - self.thermal_mass;
        debug!(
            "In last heating: error {} ms/\u{00b0}C, diff {}\u{00b0}C",
            error, diff
        );

        // Boiling absorbs heat without raising the temperature, so the
        // linear model says nothing about the thermal mass there.
        if !self.just_reset && self.max_c < 100 {
            self.thermal_mass = (self.thermal_mass + thermal_mass::correction(error, diff))
                .clamp(self.limits.thermal_mass_min, self.limits.thermal_mass_max);
        }

        let span = i32::from(self.max_target) - i32::from(self.bottom_c);
        let remain_ms = span.saturating_mul(self.thermal_mass).max(REMAIN_EXPIRED_MS as i32);
        self.phase = HeaterPhase::Heating {
            remain_ms: remain_ms as u32,
        };

        self.last_max_target = self.max_target;
        self.max_c = self.bottom_c;
        self.last_min_c = self.bottom_c;
        self.last_power_ms = remain_ms;
        self.just_reset = false;

        info!(
            "Heater burst: ON for {} ms, thermal mass {} ms/\u{00b0}C",
            remain_ms, self.thermal_mass
        );
    }
}
