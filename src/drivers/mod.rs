//! Hardware drivers.

pub mod relay;
pub mod watchdog;
