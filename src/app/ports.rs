//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RiceCooker (domain)
//! ```
//!
//! Driven adapters (MCU link, relay, event sinks) implement these traits.
//! The [`RiceCooker`](super::service::RiceCooker) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::{ActuatorError, SensorError};
use crate::sensors::SensorSample;

use super::display::DisplayState;
use super::events::CookerEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain polls this once per sensor tick.
pub trait SensorPort {
    /// Newest top/bottom probe pair, or why there is none.
    fn read_sample(&mut self) -> Result<SensorSample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the heating element.
pub trait ActuatorPort {
    /// Energise or release the heater relay.
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → front panel)
// ───────────────────────────────────────────────────────────────

/// The adapter owns segment encoding and framing; the domain only says
/// what to show.
pub trait DisplayPort {
    fn show(&mut self, state: &DisplayState);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`CookerEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &CookerEvent);
}
