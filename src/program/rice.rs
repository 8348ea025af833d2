//! Multi-stage rice program.
//!
//! The sequencer runs the handler for the current stage from
//! [`STAGE_TABLE`](super::stages::STAGE_TABLE).  When a handler asks to
//! advance, the stage clock restarts and the next stage's entry action runs
//! on the same tick.  Stages only move forward; `start()` and `cancel()` are
//! the two exits from that order.

use log::{info, warn};

use super::ProgramFault;
use super::context::StageContext;
use super::stages::{self, StageOutcome};
use crate::control::heater::Heater;

/// Rice stages in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum RiceStage {
    Wait = 0,
    Start = 1,
    Soak = 2,
    Heat = 3,
    Cook = 4,
    Vapor = 5,
    Rest = 6,
}

impl RiceStage {
    /// Number of stages; sizes the stage table.
    pub const COUNT: usize = 7;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Wait,
        Self::Start,
        Self::Soak,
        Self::Heat,
        Self::Cook,
        Self::Vapor,
        Self::Rest,
    ];

    /// Convert an index back to a stage.  Out-of-range maps to `Wait`,
    /// the stage that holds the heater off.
    pub fn from_index(idx: usize) -> Self {
        Self::ALL.get(idx).copied().unwrap_or_else(|| {
            debug_assert!(false, "invalid stage index: {idx}");
            Self::Wait
        })
    }

    pub fn name(self) -> &'static str {
        stages::descriptor(self).name
    }
}

/// Fixed parameters of one rice program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiceSettings {
    /// Cook plus vapor time, in minutes.
    pub cooking_time_min: u8,
    pub cooking_temp_c: u8,
    /// Skip soaking and resting.
    pub fast: bool,
}

impl RiceSettings {
    pub fn new(cooking_time_min: u8) -> Self {
        Self {
            cooking_time_min,
            cooking_temp_c: 100,
            fast: false,
        }
    }

    pub fn half_cooking_min(&self) -> u32 {
        u32::from(self.cooking_time_min / 2)
    }
}

#[derive(Debug, Clone)]
pub struct RiceProgram {
    settings: RiceSettings,
    stage: RiceStage,
    stage_started_ms: u64,
    finished: bool,
    fault: Option<ProgramFault>,
    vapor_max_c: u8,
}

impl RiceProgram {
    pub fn new(settings: RiceSettings, now_ms: u64) -> Self {
        Self {
            settings,
            stage: RiceStage::Wait,
            stage_started_ms: now_ms,
            finished: false,
            fault: None,
            vapor_max_c: 0,
        }
    }

    /// Run one tick of the current stage.
    pub fn step(&mut self, heater: &mut Heater, now_ms: u64) {
        if self.finished {
            // Nothing left to do; keep the element off until replaced.
            heater.power_off();
            heater.modulate(0, 0);
            return;
        }

        let outcome = {
            let mut ctx = StageContext {
                heater: &mut *heater,
                settings: &self.settings,
                elapsed_ms: now_ms.saturating_sub(self.stage_started_ms),
                vapor_max_c: &mut self.vapor_max_c,
            };
            (stages::descriptor(self.stage).on_update)(&mut ctx)
        };

        match outcome {
            Some(StageOutcome::Advance(next)) => self.advance(next, heater, now_ms),
            Some(StageOutcome::Finish) => {
                info!("Rice: finished");
                self.finished = true;
            }
            Some(StageOutcome::Abort(fault)) => {
                warn!("Rice: aborted in {} ({})", self.stage.name(), fault);
                self.finished = true;
                self.fault = Some(fault);
                // Band with nothing below it: the heater stays off.
                heater.modulate(0, 0);
            }
            None => {}
        }
    }

    /// Restart from `Start`, whatever the current stage.
    pub fn start(&mut self, now_ms: u64) {
        self.finished = false;
        self.fault = None;
        self.vapor_max_c = 0;
        self.set_stage(RiceStage::Start, now_ms);
    }

    pub fn cancel(&mut self, now_ms: u64) {
        self.set_stage(RiceStage::Wait, now_ms);
    }

    /// Best-effort minutes left: nominal length of every stage not yet
    /// passed, minus time spent in the current one.
    ///
    /// While running the estimate never drops below one minute, so a
    /// reported zero always means finished.
    pub fn remaining_time(&self, now_ms: u64) -> Option<u32> {
        if self.finished {
            return Some(0);
        }
        if self.stage == RiceStage::Wait {
            return None;
        }

        let nominal: u32 = RiceStage::ALL[self.stage as usize..]
            .iter()
            .map(|&s| (stages::descriptor(s).estimate)(&self.settings))
            .sum();
        let elapsed_min = now_ms.saturating_sub(self.stage_started_ms) / 60_000;
        let elapsed_min = u32::try_from(elapsed_min).unwrap_or(u32::MAX);

        Some(nominal.saturating_sub(elapsed_min).max(1))
    }

    pub fn settings(&self) -> &RiceSettings {
        &self.settings
    }

    pub fn stage(&self) -> RiceStage {
        self.stage
    }

    pub fn stage_started_ms(&self) -> u64 {
        self.stage_started_ms
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_waiting(&self) -> bool {
        self.stage == RiceStage::Wait
    }

    pub fn fault(&self) -> Option<ProgramFault> {
        self.fault
    }

    pub fn vapor_max_c(&self) -> u8 {
        self.vapor_max_c
    }

    // ── Internal ──────────────────────────────────────────────

    fn advance(&mut self, next: RiceStage, heater: &mut Heater, now_ms: u64) {
        debug_assert!(next > self.stage, "rice stage moved backwards");
        info!("Rice: {} -> {}", self.stage.name(), next.name());
        self.set_stage(next, now_ms);

        if let Some(enter) = stages::descriptor(next).on_enter {
            let mut ctx = StageContext {
                heater,
                settings: &self.settings,
                elapsed_ms: 0,
                vapor_max_c: &mut self.vapor_max_c,
            };
            enter(&mut ctx);
        }
    }

    fn set_stage(&mut self, stage: RiceStage, now_ms: u64) {
        self.stage = stage;
        self.stage_started_ms = now_ms;
    }
}
