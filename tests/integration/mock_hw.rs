//! Mock hardware adapter for integration tests.
//!
//! Serves scripted probe readings and records every relay write, display
//! update and event, so tests can assert on the full history without a
//! display MCU or relay attached.

use std::collections::VecDeque;

use ricecooker::app::display::DisplayState;
use ricecooker::app::events::CookerEvent;
use ricecooker::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use ricecooker::error::{ActuatorError, SensorError};
use ricecooker::sensors::SensorSample;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Returned on every read unless `scripted` has an entry.
    pub steady: Result<SensorSample, SensorError>,
    /// One-shot read results, consumed front first.
    pub scripted: VecDeque<Result<SensorSample, SensorError>>,
    pub relay_writes: Vec<bool>,
    pub shown: Vec<DisplayState>,
    pub fail_relay: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            steady: Ok(SensorSample::new(20, 20)),
            scripted: VecDeque::new(),
            relay_writes: Vec::new(),
            shown: Vec::new(),
            fail_relay: false,
        }
    }

    pub fn set_temps(&mut self, top_c: u8, bottom_c: u8) {
        self.steady = Ok(SensorSample::new(top_c, bottom_c));
    }

    pub fn script(&mut self, result: Result<SensorSample, SensorError>) {
        self.scripted.push_back(result);
    }

    /// Last state written to the relay (`false` if never written).
    pub fn relay_on(&self) -> bool {
        self.relay_writes.last().copied().unwrap_or(false)
    }

    pub fn last_shown(&self) -> Option<&DisplayState> {
        self.shown.last()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_sample(&mut self) -> Result<SensorSample, SensorError> {
        self.scripted.pop_front().unwrap_or(self.steady)
    }
}

impl ActuatorPort for MockHardware {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.fail_relay {
            return Err(ActuatorError::RelayWriteFailed);
        }
        self.relay_writes.push(on);
        Ok(())
    }
}

impl DisplayPort for MockHardware {
    fn show(&mut self, state: &DisplayState) {
        self.shown.push(*state);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<CookerEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, wanted: &CookerEvent) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }

    pub fn contains(&self, wanted: &CookerEvent) -> bool {
        self.count(wanted) > 0
    }

    pub fn position(&self, wanted: &CookerEvent) -> Option<usize> {
        self.events.iter().position(|e| e == wanted)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &CookerEvent) {
        self.events.push(*event);
    }
}
