//! RiceCooker firmware library.
//!
//! Exposes the pure-logic modules (heater control, cooking programs and
//! the orchestrator) for host-side testing.  All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod program;
pub mod scheduler;
pub mod sensors;

pub mod adapters;
pub mod drivers;
