//! Hardware adapter: bridges the MCU link and heater relay to domain ports.
//!
//! Probe readings arrive through the shared [`LinkCache`], filled by the
//! link receive path.  Display updates go the other way: the adapter keeps
//! the newest [`DisplayState`] for the link transmit path, which owns the
//! segment encoding and frame checksum.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::display::DisplayState;
use crate::app::ports::{ActuatorPort, DisplayPort, SensorPort};
use crate::drivers::relay::HeaterRelay;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::{LinkCache, SensorSample};

/// Concrete adapter combining the MCU link and the relay behind the ports.
pub struct HardwareAdapter<P: OutputPin> {
    link: &'static LinkCache,
    relay: HeaterRelay<P>,
    outbound: Option<DisplayState>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(link: &'static LinkCache, relay: HeaterRelay<P>) -> Self {
        Self {
            link,
            relay,
            outbound: None,
        }
    }

    /// Newest display state for the link transmitter.
    pub fn outbound(&self) -> Option<&DisplayState> {
        self.outbound.as_ref()
    }

    pub fn relay(&self) -> &HeaterRelay<P> {
        &self.relay
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin> SensorPort for HardwareAdapter<P> {
    fn read_sample(&mut self) -> Result<SensorSample, SensorError> {
        self.link.take()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin> ActuatorPort for HardwareAdapter<P> {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.relay.apply(on)
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<P: OutputPin> DisplayPort for HardwareAdapter<P> {
    fn show(&mut self, state: &DisplayState) {
        if self.outbound.as_ref() != Some(state) {
            debug!(
                "Display: {:02}:{:02} {:?} power={} sleep={}",
                state.hours, state.minutes, state.mode, state.power, state.sleep
            );
        }
        self.outbound = Some(*state);
    }
}
