//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! line to the ESP-IDF logger (UART / USB-CDC in production).

use log::{error, info, warn};

use crate::app::events::CookerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`CookerEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &CookerEvent) {
        match event {
            CookerEvent::ProgramInstalled(name) => info!("PROGRAM | installed {}", name),
            CookerEvent::ProgramCleared => info!("PROGRAM | cleared"),
            CookerEvent::ProgramStarted => info!("PROGRAM | started"),
            CookerEvent::ProgramCancelled => info!("PROGRAM | cancelled"),
            CookerEvent::ProgramFinished => info!("PROGRAM | finished"),
            CookerEvent::ProgramAborted(fault) => error!("PROGRAM | aborted: {}", fault),
            CookerEvent::StageChanged { from, to } => info!("STAGE | {} -> {}", from, to),
            CookerEvent::PowerChanged(on) => info!("POWER | {}", if *on { "on" } else { "off" }),
            CookerEvent::SampleRejected(e) => warn!("SENSOR | rejected: {}", e),
        }
    }
}
