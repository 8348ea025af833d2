//! Rice stage handlers and the stage table.
//!
//! Each stage is three plain `fn` pointers: an optional entry action, the
//! per-tick update, and a nominal duration used for the remaining-time
//! estimate.
//!
//! ```text
//!  WAIT ─[start]─▶ START ─[bottom ≥ 60]─▶ SOAK ─[fast | 45 min]─▶ HEAT
//!                                                                  │
//!            ┌──────────[bottom ≥ 95]──────────────────────────────┤
//!            ▼                                                     │
//!          COOK ─[time/2]─▶ VAPOR ─[time/2]─▶ REST ─[fast | 10 min]─▶ finished
//!                                                                  │
//!                                              [30 min] ─▶ aborted ┘
//! ```

use log::{debug, error, info};

use super::ProgramFault;
use super::context::StageContext;
use super::rice::{RiceSettings, RiceStage};

pub const START_TARGET_C: u8 = 60;
pub const SOAK_TARGET_C: u8 = 65;
pub const SOAK_HYSTERESIS_C: u8 = 5;
pub const SOAK_MINUTES: u32 = 45;
pub const HEAT_TARGET_C: u8 = 95;
pub const HEAT_HYSTERESIS_C: u8 = 2;
pub const HEAT_TIMEOUT_MINUTES: u32 = 30;
pub const COOK_HYSTERESIS_C: u8 = 1;
pub const VAPOR_PEAK_C: u8 = 120;
pub const VAPOR_CAP_C: u8 = 100;
pub const REST_TARGET_C: u8 = 65;
pub const REST_HYSTERESIS_C: u8 = 4;
pub const REST_MINUTES: u32 = 10;

// ---------------------------------------------------------------------------
// Handler signatures
// ---------------------------------------------------------------------------

/// What a stage update asks the sequencer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Advance(RiceStage),
    Finish,
    Abort(ProgramFault),
}

pub type StageActionFn = fn(&mut StageContext<'_>);
pub type StageUpdateFn = fn(&mut StageContext<'_>) -> Option<StageOutcome>;
/// Nominal stage length in minutes.
pub type StageEstimateFn = fn(&RiceSettings) -> u32;

/// Static descriptor for one rice stage.
pub struct StageDescriptor {
    pub stage: RiceStage,
    pub name: &'static str,
    pub on_enter: Option<StageActionFn>,
    pub on_update: StageUpdateFn,
    pub estimate: StageEstimateFn,
}

/// Indexed by `RiceStage as usize`.
pub static STAGE_TABLE: [StageDescriptor; RiceStage::COUNT] = [
    StageDescriptor {
        stage: RiceStage::Wait,
        name: "Wait",
        on_enter: Some(heater_off),
        on_update: wait_update,
        estimate: no_estimate,
    },
    StageDescriptor {
        stage: RiceStage::Start,
        name: "Start",
        on_enter: None,
        on_update: start_update,
        estimate: start_estimate,
    },
    StageDescriptor {
        stage: RiceStage::Soak,
        name: "Soak",
        on_enter: None,
        on_update: soak_update,
        estimate: soak_estimate,
    },
    StageDescriptor {
        stage: RiceStage::Heat,
        name: "Heat",
        on_enter: None,
        on_update: heat_update,
        estimate: heat_estimate,
    },
    StageDescriptor {
        stage: RiceStage::Cook,
        name: "Cook",
        on_enter: None,
        on_update: cook_update,
        estimate: RiceSettings::half_cooking_min,
    },
    StageDescriptor {
        stage: RiceStage::Vapor,
        name: "Vapor",
        on_enter: Some(heater_on),
        on_update: vapor_update,
        estimate: RiceSettings::half_cooking_min,
    },
    StageDescriptor {
        stage: RiceStage::Rest,
        name: "Rest",
        on_enter: Some(heater_off),
        on_update: rest_update,
        estimate: rest_estimate,
    },
];

/// Descriptor for `stage`.
pub fn descriptor(stage: RiceStage) -> &'static StageDescriptor {
    &STAGE_TABLE[stage as usize]
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared actions
// ═══════════════════════════════════════════════════════════════════════════

fn heater_off(ctx: &mut StageContext<'_>) {
    ctx.heater.power_off();
}

fn heater_on(ctx: &mut StageContext<'_>) {
    ctx.heater.power_on();
}

fn no_estimate(_: &RiceSettings) -> u32 {
    0
}

// Guess; depends on the starting water temperature.
fn start_estimate(_: &RiceSettings) -> u32 {
    2
}

fn soak_estimate(s: &RiceSettings) -> u32 {
    if s.fast { 0 } else { SOAK_MINUTES }
}

// Fast programs skip the soak and start from a colder pot.
fn heat_estimate(s: &RiceSettings) -> u32 {
    if s.fast { 4 } else { 2 }
}

fn rest_estimate(s: &RiceSettings) -> u32 {
    if s.fast { 0 } else { REST_MINUTES }
}

fn log_stage(ctx: &StageContext<'_>, stage: &str, target_c: u8) {
    debug!(
        "Rice {}: top {}\u{00b0}C, bottom {}\u{00b0}C, target {}\u{00b0}C",
        stage,
        ctx.heater.top_temperature(),
        ctx.heater.bottom_temperature(),
        target_c
    );
}

// ═══════════════════════════════════════════════════════════════════════════
//  Stage updates
// ═══════════════════════════════════════════════════════════════════════════

fn wait_update(ctx: &mut StageContext<'_>) -> Option<StageOutcome> {
    ctx.heater.power_off();
    None
}

fn start_update(ctx: &mut StageContext<'_>) -> Option<StageOutcome> {
    log_stage(ctx, "Start", START_TARGET_C);
    ctx.heater.modulate(START_TARGET_C, 0);

    (ctx.heater.bottom_temperature() >= START_TARGET_C).then_some(StageOutcome::Advance(RiceStage::Soak))
}

fn soak_update(ctx: &mut StageContext<'_>) -> Option<StageOutcome> {
    log_stage(ctx, "Soak", SOAK_TARGET_C);
    ctx.heater.modulate(SOAK_TARGET_C, SOAK_HYSTERESIS_C);

    (ctx.settings.fast || ctx.elapsed_at_least_min(SOAK_MINUTES))
        .then_some(StageOutcome::Advance(RiceStage::Heat))
}

fn heat_update(ctx: &mut StageContext<'_>) -> Option<StageOutcome> {
    log_stage(ctx, "Heat", HEAT_TARGET_C);
    ctx.heater.modulate(HEAT_TARGET_C, HEAT_HYSTERESIS_C);

    if ctx.heater.bottom_temperature() >= HEAT_TARGET_C {
        return Some(StageOutcome::Advance(RiceStage::Cook));
    }

    if ctx.elapsed_at_least_min(HEAT_TIMEOUT_MINUTES) {
        error!(
            "Rice Heat: {}\u{00b0}C not reached after {} min, stopping",
            HEAT_TARGET_C, HEAT_TIMEOUT_MINUTES
        );
        ctx.heater.power_off();
        return Some(StageOutcome::Abort(ProgramFault::HeatTimeout));
    }

    None
}

fn cook_update(ctx: &mut StageContext<'_>) -> Option<StageOutcome> {
    let target = ctx.settings.cooking_temp_c;
    let top = ctx.heater.top_temperature();
    *ctx.vapor_max_c = top.max(*ctx.vapor_max_c).min(VAPOR_CAP_C);

    log_stage(ctx, "Cook", target);

    // Keep the steam up: top probe falling below its best so far.
    if top < *ctx.vapor_max_c {
        ctx.heater.power_on();
    }
    ctx.heater.modulate(target, COOK_HYSTERESIS_C);

    ctx.elapsed_at_least_min(ctx.half_cooking_min())
        .then_some(StageOutcome::Advance(RiceStage::Vapor))
}

fn vapor_update(ctx: &mut StageContext<'_>) -> Option<StageOutcome> {
    let target = vapor_target(ctx.settings, ctx.elapsed_min());
    log_stage(ctx, "Vapor", target);
    ctx.heater.modulate(target, 0);

    ctx.elapsed_at_least_min(ctx.half_cooking_min())
        .then_some(StageOutcome::Advance(RiceStage::Rest))
}

fn rest_update(ctx: &mut StageContext<'_>) -> Option<StageOutcome> {
    log_stage(ctx, "Rest", REST_TARGET_C);
    ctx.heater.modulate(REST_TARGET_C, REST_HYSTERESIS_C);

    if ctx.settings.fast || ctx.elapsed_at_least_min(REST_MINUTES) {
        info!("Rice: rest complete");
        return Some(StageOutcome::Finish);
    }
    None
}

/// Linear ramp from the cooking temperature to [`VAPOR_PEAK_C`] over half
/// the cooking time, in whole minutes.
pub fn vapor_target(settings: &RiceSettings, elapsed_min: u64) -> u8 {
    let half = u64::from(settings.half_cooking_min().max(1));
    let start = i64::from(settings.cooking_temp_c);
    let rise = i64::from(VAPOR_PEAK_C) - start;
    let progress = elapsed_min.min(half) as i64;
    (start + rise * progress / half as i64).clamp(0, i64::from(u8::MAX)) as u8
}
