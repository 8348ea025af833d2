//! Adapters: concrete implementations of the application ports.

pub mod hardware;
pub mod log_sink;
pub mod time;
