//! Heater relay driver.
//!
//! Drives the heating element's relay coil through any
//! [`embedded_hal::digital::OutputPin`].  The pin is written only when the
//! requested state differs from the current one, and every energise is
//! counted as one switch cycle for wear accounting.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::ActuatorPort;
use crate::error::ActuatorError;

pub struct HeaterRelay<P: OutputPin> {
    pin: P,
    energized: bool,
    switch_cycles: u32,
}

impl<P: OutputPin> HeaterRelay<P> {
    /// Take the pin and drive it low so the relay starts released.
    pub fn new(mut pin: P) -> Result<Self, ActuatorError> {
        pin.set_low().map_err(|_| ActuatorError::RelayWriteFailed)?;
        Ok(Self {
            pin,
            energized: false,
            switch_cycles: 0,
        })
    }

    /// Bring the relay to `on`.  No-op if already there.
    pub fn apply(&mut self, on: bool) -> Result<(), ActuatorError> {
        if on == self.energized {
            return Ok(());
        }

        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            warn!("Relay: write {} failed", if on { "high" } else { "low" });
            return Err(ActuatorError::RelayWriteFailed);
        }

        self.energized = on;
        if on {
            self.switch_cycles = self.switch_cycles.saturating_add(1);
        }
        info!(
            "Relay: {} (cycles {})",
            if on { "energised" } else { "released" },
            self.switch_cycles
        );
        Ok(())
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }

    /// Off → on transitions since construction.
    pub fn switch_cycles(&self) -> u32 {
        self.switch_cycles
    }
}

impl<P: OutputPin> ActuatorPort for HeaterRelay<P> {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.apply(on)
    }
}
