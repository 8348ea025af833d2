//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (front-panel
//! buttons, a future remote interface) that the
//! [`RiceCooker`](super::service::RiceCooker) interprets and acts upon.

use crate::program::ProgramKind;

/// Cooking-time presets cycled by the Timer button, in minutes.
pub const COOKING_TIME_PRESETS: [u8; 5] = [20, 30, 40, 50, 60];

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookerCommand {
    /// Start the installed program from its first active stage.
    Start,

    /// Stop heating and send the installed program back to waiting.
    Cancel,

    /// Install a fresh program of this kind.
    Select(ProgramKind),

    /// Install the next program in menu order.
    NextProgram,

    /// Advance the cooking-time preset used by rice programs.
    NextCookingTime,

    /// Cooking temperature (°C) for subsequently installed rice programs.
    SetCookingTemp(u8),

    /// Remove the installed program, leaving the heater off.
    ClearProgram,
}

/// Front-panel buttons reported by the display MCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Timer,
    Cancel,
    Select,
    Start,
}

impl Button {
    pub const ALL: [Self; 4] = [Self::Timer, Self::Cancel, Self::Select, Self::Start];

    pub const fn command(self) -> CookerCommand {
        match self {
            Self::Timer => CookerCommand::NextCookingTime,
            Self::Cancel => CookerCommand::Cancel,
            Self::Select => CookerCommand::NextProgram,
            Self::Start => CookerCommand::Start,
        }
    }
}

/// Preset after `current`, wrapping to the shortest.
pub fn next_cooking_time(current_min: u8) -> u8 {
    COOKING_TIME_PRESETS
        .iter()
        .copied()
        .find(|&preset| preset > current_min)
        .unwrap_or(COOKING_TIME_PRESETS[0])
}
