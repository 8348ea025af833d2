//! Thermal-mass estimation.
//!
//! The heater learns a single constant: milliseconds of element on-time
//! needed to raise the bottom temperature by 1 °C.  At the start of every
//! heating burst the previous burst is evaluated and the estimate is nudged
//! by a bounded correction.

/// Largest overshoot/undershoot (°C) considered when scaling a correction.
pub const MAX_TARGET_DIFF_C: i32 = 3;

/// Correction applied per °C of overshoot/undershoot.
pub const CORRECTION_PER_C_MS: i32 = 500;

/// Smallest correction applied when the previous burst missed its target,
/// and the largest one applied when it hit it exactly.
pub const MIN_CORRECTION_MS: i32 = 200;

/// Milliseconds per °C observed in the previous burst.
///
/// When the temperature did not rise at all (`range < 1`, heat went into
/// phase change or the sensor lagged) the previous on-time is scaled up by
/// a quarter instead of dividing.
pub fn time_needed(last_power_ms: i32, range_c: i32) -> i32 {
    if range_c >= 1 {
        last_power_ms / range_c
    } else {
        last_power_ms.saturating_add(last_power_ms / 4)
    }
}

/// How far the previous burst's peak landed below (positive) or above
/// (negative) its upper target, clamped to ±[`MAX_TARGET_DIFF_C`].
pub fn target_diff(last_max_target_c: u8, max_c: u8) -> i32 {
    (i32::from(last_max_target_c) - i32::from(max_c)).clamp(-MAX_TARGET_DIFF_C, MAX_TARGET_DIFF_C)
}

/// Bounded adjustment to the thermal mass for a given estimate `error`
/// (`time_needed - thermal_mass`) and target `diff`.
///
/// | diff | correction range |
/// |------|------------------|
/// | 0    | `[-200, 200]` |
/// | > 0  | `[200, 500 * diff]` (undershoot: mass was too small) |
/// | < 0  | `[500 * diff, -200]` (overshoot: mass was too large) |
pub fn correction(error: i32, diff: i32) -> i32 {
    match diff {
        0 => error.clamp(-MIN_CORRECTION_MS, MIN_CORRECTION_MS),
        d if d > 0 => error.clamp(MIN_CORRECTION_MS, CORRECTION_PER_C_MS * d),
        d => error.clamp(CORRECTION_PER_C_MS * d, -MIN_CORRECTION_MS),
    }
}
