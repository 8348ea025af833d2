//! Keep-warm program: holds a fixed band indefinitely and leaves all
//! switching decisions to the heater.

use log::debug;

use crate::control::heater::Heater;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmStage {
    Wait,
    Warm,
}

impl WarmStage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wait => "Wait",
            Self::Warm => "Warm",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeepWarm {
    target_c: u8,
    hysteresis_c: u8,
    stage: WarmStage,
}

impl KeepWarm {
    pub fn new(target_c: u8, hysteresis_c: u8) -> Self {
        Self {
            target_c,
            hysteresis_c,
            stage: WarmStage::Wait,
        }
    }

    pub fn step(&mut self, heater: &mut Heater) {
        match self.stage {
            WarmStage::Wait => {
                debug!(
                    "Keep warm waiting. top {}\u{00b0}C, bottom {}\u{00b0}C",
                    heater.top_temperature(),
                    heater.bottom_temperature()
                );
            }
            WarmStage::Warm => {
                debug!(
                    "Keep warm. top {}\u{00b0}C, bottom {}\u{00b0}C, target {}\u{00b1}{}\u{00b0}C",
                    heater.top_temperature(),
                    heater.bottom_temperature(),
                    self.target_c,
                    self.hysteresis_c
                );
                heater.modulate(self.target_c, self.hysteresis_c);
            }
        }
    }

    pub fn start(&mut self) {
        self.stage = WarmStage::Warm;
    }

    pub fn cancel(&mut self) {
        self.stage = WarmStage::Wait;
    }

    /// Keep warm has no defined end.
    pub fn remaining_time(&self) -> Option<u32> {
        None
    }

    pub fn is_waiting(&self) -> bool {
        self.stage == WarmStage::Wait
    }

    pub fn stage(&self) -> WarmStage {
        self.stage
    }
}
