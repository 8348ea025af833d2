//! What the front panel should show.

/// Which pair of numbers `hours`/`minutes` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Remaining program time.
    Remaining,
    /// Raw probe readings: `hours` = top °C, `minutes` = bottom °C.
    Temperatures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub power: bool,
    pub hours: u8,
    pub minutes: u8,
    pub sleep: bool,
    pub mode: DisplayMode,
}

impl DisplayState {
    /// Remaining-time view.  The panel has two hour digits, so anything
    /// longer shows as 99 hours.
    pub fn remaining(power: bool, minutes_left: u32) -> Self {
        Self {
            power,
            hours: (minutes_left / 60).min(99) as u8,
            minutes: (minutes_left % 60) as u8,
            sleep: false,
            mode: DisplayMode::Remaining,
        }
    }

    pub fn temperatures(power: bool, top_c: u8, bottom_c: u8, sleep: bool) -> Self {
        Self {
            power,
            hours: top_c,
            minutes: bottom_c,
            sleep,
            mode: DisplayMode::Temperatures,
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::temperatures(false, 0, 0, true)
    }
}
