//! Cooking programs.
//!
//! A [`Program`] is a closed set of variants, each owning its complete
//! state.  The orchestrator holds at most one and replaces it wholesale
//! when the cooking mode changes.
//!
//! | Variant      | Stages                                         | Ends |
//! |--------------|------------------------------------------------|------|
//! | `KeepWarm`   | Wait, Warm                                     | never |
//! | `Rice`       | Wait, Start, Soak, Heat, Cook, Vapor, Rest     | after Rest, or Heat watchdog |

pub mod context;
pub mod keep_warm;
pub mod rice;
pub mod stages;

use core::fmt;

use crate::config::CookerConfig;
use crate::control::heater::Heater;
use keep_warm::KeepWarm;
use rice::{RiceProgram, RiceSettings};

/// Name reported when no program is installed.
pub const NO_PROGRAM_NAME: &str = "None";

// ---------------------------------------------------------------------------
// Program identity
// ---------------------------------------------------------------------------

/// Selectable programs, in front-panel menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    Rice,
    FastRice,
    KeepWarm,
}

impl ProgramKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rice => "Rice",
            Self::FastRice => "Fast Rice",
            Self::KeepWarm => "Keep Warm",
        }
    }

    /// The next entry in the menu, wrapping around.
    pub const fn next(self) -> Self {
        match self {
            Self::Rice => Self::FastRice,
            Self::FastRice => Self::KeepWarm,
            Self::KeepWarm => Self::Rice,
        }
    }
}

/// Why a program stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramFault {
    /// The Heat stage did not reach its target within its time budget.
    HeatTimeout,
}

impl fmt::Display for ProgramFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeatTimeout => write!(f, "heat stage timed out"),
        }
    }
}

// ---------------------------------------------------------------------------
// Program
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Program {
    KeepWarm(KeepWarm),
    Rice(RiceProgram),
}

impl Program {
    /// Keep-warm program using the configured target band.
    pub fn keep_warm(config: &CookerConfig) -> Self {
        Self::KeepWarm(KeepWarm::new(
            config.keep_warm_target_c,
            config.keep_warm_hysteresis_c,
        ))
    }

    pub fn rice(settings: RiceSettings, now_ms: u64) -> Self {
        Self::Rice(RiceProgram::new(settings, now_ms))
    }

    /// Build a fresh program for a menu entry.
    pub fn from_kind(
        kind: ProgramKind,
        config: &CookerConfig,
        cooking_time_min: u8,
        cooking_temp_c: u8,
        now_ms: u64,
    ) -> Self {
        match kind {
            ProgramKind::KeepWarm => Self::keep_warm(config),
            ProgramKind::Rice | ProgramKind::FastRice => Self::rice(
                RiceSettings {
                    cooking_time_min,
                    cooking_temp_c,
                    fast: kind == ProgramKind::FastRice,
                },
                now_ms,
            ),
        }
    }

    pub fn kind(&self) -> ProgramKind {
        match self {
            Self::KeepWarm(_) => ProgramKind::KeepWarm,
            Self::Rice(p) if p.settings().fast => ProgramKind::FastRice,
            Self::Rice(_) => ProgramKind::Rice,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Declare this tick's heater band and advance stages.
    pub fn step(&mut self, heater: &mut Heater, now_ms: u64) {
        match self {
            Self::KeepWarm(p) => p.step(heater),
            Self::Rice(p) => p.step(heater, now_ms),
        }
    }

    /// Start from the first active stage; never resumes.
    pub fn start(&mut self, now_ms: u64) {
        match self {
            Self::KeepWarm(p) => p.start(),
            Self::Rice(p) => p.start(now_ms),
        }
    }

    pub fn cancel(&mut self, now_ms: u64) {
        match self {
            Self::KeepWarm(p) => p.cancel(),
            Self::Rice(p) => p.cancel(now_ms),
        }
    }

    /// Minutes left, `None` when undefined (waiting, or a program that
    /// never ends), `Some(0)` once finished.
    pub fn remaining_time(&self, now_ms: u64) -> Option<u32> {
        match self {
            Self::KeepWarm(p) => p.remaining_time(),
            Self::Rice(p) => p.remaining_time(now_ms),
        }
    }

    pub fn fault(&self) -> Option<ProgramFault> {
        match self {
            Self::KeepWarm(_) => None,
            Self::Rice(p) => p.fault(),
        }
    }

    /// `true` while waiting for `start()`.
    pub fn is_waiting(&self) -> bool {
        match self {
            Self::KeepWarm(p) => p.is_waiting(),
            Self::Rice(p) => p.is_waiting(),
        }
    }

    pub fn stage_name(&self) -> &'static str {
        match self {
            Self::KeepWarm(p) => p.stage().name(),
            Self::Rice(p) => p.stage().name(),
        }
    }
}
