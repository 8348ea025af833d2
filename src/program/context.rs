//! Context threaded through every rice stage handler.
//!
//! Handlers get the heater's control surface and sensor cache, the
//! program's fixed settings, and the little mutable scratch the stages
//! share.  Stage bookkeeping (current stage, entry time) stays with
//! [`RiceProgram`](super::rice::RiceProgram).

use super::rice::RiceSettings;
use crate::control::heater::Heater;

pub struct StageContext<'a> {
    pub heater: &'a mut Heater,
    pub settings: &'a RiceSettings,
    /// Milliseconds since the current stage was entered.
    pub elapsed_ms: u64,
    /// Highest top temperature seen while cooking; never decreases.
    pub vapor_max_c: &'a mut u8,
}

impl StageContext<'_> {
    pub fn elapsed_min(&self) -> u64 {
        self.elapsed_ms / 60_000
    }

    /// `true` once the stage has run for at least `minutes`.
    pub fn elapsed_at_least_min(&self, minutes: u32) -> bool {
        self.elapsed_ms >= u64::from(minutes) * 60_000
    }

    /// Half the cooking time, shared by Cook and Vapor.
    pub fn half_cooking_min(&self) -> u32 {
        self.settings.half_cooking_min()
    }
}
