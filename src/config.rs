//! System configuration parameters
//!
//! All tunable parameters for the rice cooker.  Nothing here is persisted:
//! the configuration is built at boot and every learned value starts fresh.
//! A JSON override may be baked in at build time; missing fields keep their
//! defaults.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookerConfig {
    // --- Timing ---
    /// Sensor refresh interval (milliseconds)
    pub sensor_interval_ms: u32,
    /// Control loop interval (milliseconds)
    pub control_interval_ms: u32,

    // --- Heater ---
    /// Minimum off-time after a heating burst (milliseconds)
    pub relay_cooldown_ms: u32,
    /// Seed for the learned thermal mass (ms of heating per °C)
    pub initial_thermal_mass_ms_per_c: i32,
    /// Lower bound on the learned thermal mass
    pub thermal_mass_min: i32,
    /// Upper bound on the learned thermal mass
    pub thermal_mass_max: i32,
    /// Keep the learned thermal mass when a new program is installed
    pub preserve_thermal_mass_on_reset: bool,

    // --- Keep warm ---
    pub keep_warm_target_c: u8,
    pub keep_warm_hysteresis_c: u8,

    // --- Sensor plausibility ---
    /// Samples below this are dropped (°C)
    pub min_plausible_c: u8,
    /// Samples above this are dropped (°C)
    pub max_plausible_c: u8,

    // --- Rice program defaults ---
    /// Cooking time used by newly selected rice programs (minutes)
    pub default_cooking_time_min: u8,
    /// Cooking temperature used by newly selected rice programs (°C)
    pub default_cooking_temp_c: u8,
}

impl Default for CookerConfig {
    fn default() -> Self {
        Self {
            // Timing
            sensor_interval_ms: 100,  // 10 Hz
            control_interval_ms: 500, // 2 Hz

            // Heater
            relay_cooldown_ms: 30_000,
            initial_thermal_mass_ms_per_c: 1500,
            thermal_mass_min: 100,
            thermal_mass_max: 8000,
            preserve_thermal_mass_on_reset: true,

            // Keep warm
            keep_warm_target_c: 65,
            keep_warm_hysteresis_c: 2,

            // Plausibility
            min_plausible_c: 0,
            max_plausible_c: 150,

            // Rice defaults
            default_cooking_time_min: 40,
            default_cooking_temp_c: 100,
        }
    }
}

impl CookerConfig {
    /// Parse a JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!("Config override rejected: {}", e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field for a sane range.
    ///
    /// Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_interval_ms == 0 || self.control_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick intervals must be > 0"));
        }
        if self.sensor_interval_ms > self.control_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "sensor interval must not exceed control interval",
            ));
        }
        if self.relay_cooldown_ms == 0 {
            return Err(ConfigError::ValidationFailed("relay_cooldown_ms must be > 0"));
        }
        if self.thermal_mass_min <= 0 || self.thermal_mass_min > self.thermal_mass_max {
            return Err(ConfigError::ValidationFailed(
                "thermal mass bounds must satisfy 0 < min <= max",
            ));
        }
        if !(self.thermal_mass_min..=self.thermal_mass_max)
            .contains(&self.initial_thermal_mass_ms_per_c)
        {
            return Err(ConfigError::ValidationFailed(
                "initial thermal mass outside its bounds",
            ));
        }
        if self.keep_warm_hysteresis_c > self.keep_warm_target_c {
            return Err(ConfigError::ValidationFailed(
                "keep-warm hysteresis larger than its target",
            ));
        }
        if self.min_plausible_c >= self.max_plausible_c {
            return Err(ConfigError::ValidationFailed("plausible range is empty"));
        }
        if self.default_cooking_time_min < 2 {
            return Err(ConfigError::ValidationFailed(
                "cooking time must be at least 2 minutes",
            ));
        }
        Ok(())
    }
}
