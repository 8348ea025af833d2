//! Outbound application events.
//!
//! The [`RiceCooker`](super::service::RiceCooker) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::error::SensorError;
use crate::program::ProgramFault;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookerEvent {
    /// A program was installed (carries its display name).
    ProgramInstalled(&'static str),

    /// The installed program was removed without replacement.
    ProgramCleared,

    /// The installed program was started from its first active stage.
    ProgramStarted,

    /// The installed program was sent back to waiting.
    ProgramCancelled,

    /// The program's stage advanced during a control tick.
    StageChanged { from: &'static str, to: &'static str },

    /// A rice program completed normally.
    ProgramFinished,

    /// A program stopped early.
    ProgramAborted(ProgramFault),

    /// The heating element changed state.
    PowerChanged(bool),

    /// A sensor sample was dropped; the previous reading is kept.
    SampleRejected(SensorError),
}
