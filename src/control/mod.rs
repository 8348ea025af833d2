//! Heating-element control.
//!
//! [`heater::Heater`] is the adaptive bang-bang controller; the learning
//! arithmetic it applies once per heating burst lives in [`thermal_mass`]
//! so it can be tested in isolation.

pub mod heater;
pub mod thermal_mass;
