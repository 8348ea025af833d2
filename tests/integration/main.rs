//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the orchestrator against
//! mock adapters.  All tests run on the host with no real hardware.

mod cooker_tests;
mod mock_hw;
