//! Temperature samples from the display/sensor MCU.
//!
//! The cooker has two probes, top (lid/steam) and bottom (pot base), both
//! read by the separate display MCU and reported over its serial link.
//! The link adapter publishes each valid frame into a [`LinkCache`]; the
//! sensor tick takes the newest pair from there and validates it before
//! the heater ever sees it.

use core::sync::atomic::{AtomicU8, AtomicU16, Ordering};

use crate::config::CookerConfig;
use crate::error::SensorError;

/// One pair of probe readings, in whole °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorSample {
    pub top_c: u8,
    pub bottom_c: u8,
}

impl SensorSample {
    pub const fn new(top_c: u8, bottom_c: u8) -> Self {
        Self { top_c, bottom_c }
    }
}

/// Reject samples outside the configured plausible range.
///
/// Both probes are checked; the first offending reading is reported.
pub fn validate(sample: SensorSample, config: &CookerConfig) -> Result<SensorSample, SensorError> {
    let plausible = config.min_plausible_c..=config.max_plausible_c;
    for celsius in [sample.top_c, sample.bottom_c] {
        if !plausible.contains(&celsius) {
            return Err(SensorError::OutOfRange { celsius });
        }
    }
    Ok(sample)
}

// ── Link cache ────────────────────────────────────────────────

const FLAG_SEEN: u8 = 0b01;
const FLAG_FRESH: u8 = 0b10;

/// Latest probe pair received from the MCU link.
///
/// Written by the link receive path, read by the sensor tick.  Both
/// temperatures live in one atomic word so a reader never sees a top
/// reading from one frame paired with a bottom reading from another.
pub struct LinkCache {
    packed: AtomicU16,
    flags: AtomicU8,
}

/// The cache shared between the link receive path and the sensor tick.
pub static LINK: LinkCache = LinkCache::new();

impl LinkCache {
    pub const fn new() -> Self {
        Self {
            packed: AtomicU16::new(0),
            flags: AtomicU8::new(0),
        }
    }

    /// Store a frame's readings.  Lock-free.
    pub fn publish(&self, sample: SensorSample) {
        let packed = (u16::from(sample.top_c) << 8) | u16::from(sample.bottom_c);
        self.packed.store(packed, Ordering::Release);
        self.flags.fetch_or(FLAG_SEEN | FLAG_FRESH, Ordering::AcqRel);
    }

    /// Take the newest sample if one arrived since the last call.
    pub fn take(&self) -> Result<SensorSample, SensorError> {
        let flags = self.flags.fetch_and(!FLAG_FRESH, Ordering::AcqRel);
        if flags & FLAG_SEEN == 0 {
            return Err(SensorError::LinkDown);
        }
        if flags & FLAG_FRESH == 0 {
            return Err(SensorError::Stale);
        }
        let packed = self.packed.load(Ordering::Acquire);
        Ok(SensorSample {
            top_c: (packed >> 8) as u8,
            bottom_c: packed as u8,
        })
    }

    /// `true` once any frame has been published.
    pub fn is_up(&self) -> bool {
        self.flags.load(Ordering::Acquire) & FLAG_SEEN != 0
    }
}

impl Default for LinkCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Publish a frame into the shared [`LINK`] cache.
pub fn publish_from_link(top_c: u8, bottom_c: u8) {
    LINK.publish(SensorSample::new(top_c, bottom_c));
}
