//! Application core: pure domain logic, zero I/O.
//!
//! The [`RiceCooker`](service::RiceCooker) orchestrator ties the heater to
//! the active cooking program.  All interaction with hardware happens
//! through the **port traits** in [`ports`], so the whole layer runs
//! against mocks on the host.

pub mod commands;
pub mod display;
pub mod events;
pub mod ports;
pub mod service;
