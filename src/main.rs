//! RiceCooker Firmware: main entry point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink     MonotonicClock      │
//! │  (Sensor+Actuator+Display) (EventSink)     (uptime)            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              RiceCooker (pure logic)                   │    │
//! │  │  Program · Heater                                      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  TickScheduler ──▶ event queue ──▶ main loop                   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::PinDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use log::{info, warn};

use ricecooker::adapters::hardware::HardwareAdapter;
use ricecooker::adapters::log_sink::LogEventSink;
use ricecooker::adapters::time::MonotonicClock;
use ricecooker::app::service::RiceCooker;
use ricecooker::config::CookerConfig;
use ricecooker::drivers::relay::HeaterRelay;
use ricecooker::drivers::watchdog::{DEFAULT_TIMEOUT_MS, Watchdog};
use ricecooker::error::Error;
use ricecooker::events::{self, Event, push_event};
use ricecooker::scheduler::TickScheduler;
use ricecooker::sensors::LINK;

/// Idle time between loop passes; well under the sensor interval.
const LOOP_DELAY_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RiceCooker v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = match option_env!("RICECOOKER_CONFIG_JSON") {
        Some(json) => CookerConfig::from_json(json).map_err(Error::from)?,
        None => CookerConfig::default(),
    };
    config.validate().map_err(Error::from)?;

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    // Heater relay coil on GPIO4, active high.
    let relay_pin = PinDriver::output(peripherals.pins.gpio4)?;
    let relay = HeaterRelay::new(relay_pin).map_err(Error::from)?;
    let watchdog = Watchdog::new(DEFAULT_TIMEOUT_MS);

    // ── 4. Adapters and core ──────────────────────────────────
    // The MCU link task publishes probe frames into `LINK` and pushes
    // `Event::Button` for every decoded key press.
    let mut hw = HardwareAdapter::new(&LINK, relay);
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();
    let mut sched = TickScheduler::new(&config);
    let mut cooker = RiceCooker::new(config);

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    loop {
        let now_ms = clock.uptime_ms();

        for tick in sched.poll(now_ms) {
            if !push_event(tick.into()) {
                warn!("Event queue full, dropped {:?}", tick);
            }
        }

        events::drain_events(|event| match event {
            Event::SensorTick => cooker.sensor_tick(&mut hw, &mut sink),
            Event::ControlTick => {
                cooker.control_tick(now_ms, &mut hw, &mut sink);
                watchdog.feed();
            }
            Event::Button(button) => cooker.handle_button(button, now_ms, &mut sink),
        });

        FreeRtos::delay_ms(LOOP_DELAY_MS);
    }
}
