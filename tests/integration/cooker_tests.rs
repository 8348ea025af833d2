//! Integration tests for the RiceCooker → Program → Heater pipeline.
//!
//! Each test drives the orchestrator the way the main loop does: a sensor
//! tick followed by a control tick every 500 ms of simulated time, with
//! front-panel buttons pressed in between.

use crate::mock_hw::{MockHardware, RecordingSink};

use ricecooker::app::commands::{Button, CookerCommand};
use ricecooker::app::display::DisplayMode;
use ricecooker::app::events::CookerEvent;
use ricecooker::app::service::RiceCooker;
use ricecooker::config::CookerConfig;
use ricecooker::control::heater::Heater;
use ricecooker::control::thermal_mass;
use ricecooker::error::SensorError;
use ricecooker::program::{Program, ProgramFault, ProgramKind};
use ricecooker::sensors::SensorSample;

const TICK_MS: u64 = 500;
const MIN: u64 = 60_000;

struct Rig {
    cooker: RiceCooker,
    hw: MockHardware,
    sink: RecordingSink,
    now_ms: u64,
}

impl Rig {
    fn new() -> Self {
        Self {
            cooker: RiceCooker::new(CookerConfig::default()),
            hw: MockHardware::new(),
            sink: RecordingSink::new(),
            now_ms: 0,
        }
    }

    fn press(&mut self, button: Button) {
        self.cooker.handle_button(button, self.now_ms, &mut self.sink);
    }

    fn tick(&mut self) {
        self.now_ms += TICK_MS;
        self.cooker.sensor_tick(&mut self.hw, &mut self.sink);
        self.cooker.control_tick(self.now_ms, &mut self.hw, &mut self.sink);
    }

    fn run_for(&mut self, ms: u64) {
        let end = self.now_ms + ms;
        while self.now_ms < end {
            self.tick();
        }
    }

    /// Tick until `done` holds or `limit_ms` of simulated time passes.
    fn run_until(&mut self, limit_ms: u64, done: impl Fn(&RiceCooker) -> bool) -> bool {
        let end = self.now_ms + limit_ms;
        while self.now_ms < end {
            self.tick();
            if done(&self.cooker) {
                return true;
            }
        }
        false
    }

    fn stage(&self) -> &'static str {
        self.cooker.program().map_or("-", Program::stage_name)
    }

    /// Select Fast Rice with a 20 minute cooking time.
    fn select_fast_rice_20(&mut self) {
        self.press(Button::Select); // Rice
        self.press(Button::Select); // Fast Rice
        for _ in 0..3 {
            self.press(Button::Timer); // 40 -> 50 -> 60 -> 20
        }
        assert_eq!(self.cooker.program_name(), "Fast Rice");
        assert_eq!(self.cooker.cooking_time_min(), 20);
    }

    fn stage_changes(&self) -> Vec<(&'static str, &'static str)> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                CookerEvent::StageChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

// ── Idle behaviour ────────────────────────────────────────────

#[test]
fn no_program_shows_temperatures_and_sleeps() {
    let mut rig = Rig::new();
    rig.hw.set_temps(30, 40);
    rig.tick();

    let shown = rig.hw.last_shown().copied().unwrap();
    assert_eq!(shown.mode, DisplayMode::Temperatures);
    assert_eq!((shown.hours, shown.minutes), (30, 40));
    assert!(shown.sleep);
    assert!(!shown.power);
    assert!(!rig.hw.relay_on());
    assert_eq!(rig.cooker.program_name(), "None");
}

#[test]
fn select_button_cycles_menu() {
    let mut rig = Rig::new();
    let mut names = Vec::new();
    for _ in 0..4 {
        rig.press(Button::Select);
        names.push(rig.cooker.program_name());
    }
    assert_eq!(names, ["Rice", "Fast Rice", "Keep Warm", "Rice"]);
}

#[test]
fn waiting_program_shows_temperatures_awake() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    rig.hw.set_temps(25, 26);
    rig.tick();

    let shown = rig.hw.last_shown().copied().unwrap();
    assert_eq!(shown.mode, DisplayMode::Temperatures);
    assert!(!shown.sleep);
    assert!(!rig.cooker.power());
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn rice_soaks_after_warm_up_then_heats_after_soak_time() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    assert_eq!(rig.cooker.cooking_time_min(), 40);
    assert_eq!(rig.cooker.cooking_temp_c(), 100);
    rig.press(Button::Start);
    assert!(rig.sink.contains(&CookerEvent::ProgramStarted));

    rig.hw.set_temps(20, 20);
    rig.tick();
    assert_eq!(rig.stage(), "Start");
    assert!(rig.cooker.power());
    assert!(rig.hw.relay_on());

    rig.hw.set_temps(50, 60);
    rig.tick();
    assert_eq!(rig.stage(), "Soak");
    assert!(rig.sink.contains(&CookerEvent::StageChanged {
        from: "Start",
        to: "Soak"
    }));

    rig.hw.set_temps(63, 63);
    rig.run_for(46 * MIN);
    assert_eq!(rig.stage(), "Heat");
    assert_eq!(rig.stage_changes(), [("Start", "Soak"), ("Soak", "Heat")]);
}

#[test]
fn fast_rice_remaining_time_skips_soak_and_rest() {
    let mut rig = Rig::new();
    rig.select_fast_rice_20();
    rig.press(Button::Start);

    assert_eq!(
        rig.cooker.program().and_then(|p| p.remaining_time(rig.now_ms)),
        Some(26)
    );

    rig.tick();
    let shown = rig.hw.last_shown().copied().unwrap();
    assert_eq!(shown.mode, DisplayMode::Remaining);
    assert_eq!((shown.hours, shown.minutes), (0, 26));
}

#[test]
fn zero_rise_cycle_scales_previous_burst() {
    assert_eq!(thermal_mass::time_needed(3000, 0), 3750);

    let mut h = Heater::new(&CookerConfig::default());
    h.ingest(20, 20);
    h.modulate(22, 0);
    h.step(0);
    assert_eq!(h.last_power_ms(), 3000);

    h.step(3000); // burst expires
    h.step(33_000); // cool-down over, still 20 °C
    // error = 3750 - 1500, diff = 2, correction capped at 1000
    assert_eq!(h.thermal_mass(), 2500);
    assert_eq!(h.last_power_ms(), 5000);
}

#[test]
fn heat_watchdog_aborts_and_leaves_heater_off() {
    let mut rig = Rig::new();
    rig.select_fast_rice_20();
    rig.hw.set_temps(80, 80);
    rig.press(Button::Start);

    assert!(rig.run_until(10_000, |c| {
        c.program().map(Program::stage_name) == Some("Heat")
    }));
    let heat_at = rig.now_ms;

    while rig.now_ms + TICK_MS < heat_at + 30 * MIN {
        rig.tick();
    }
    assert_eq!(rig.stage(), "Heat");
    assert!(!rig.sink.contains(&CookerEvent::ProgramAborted(ProgramFault::HeatTimeout)));

    rig.tick();
    assert!(rig.now_ms >= heat_at + 30 * MIN);
    rig.tick();

    assert!(rig.cooker.program().is_none());
    assert!(!rig.cooker.power());
    assert!(!rig.hw.relay_on());

    let aborted = rig
        .sink
        .position(&CookerEvent::ProgramAborted(ProgramFault::HeatTimeout))
        .unwrap();
    let cleared = rig.sink.position(&CookerEvent::ProgramCleared).unwrap();
    assert!(aborted < cleared);

    let shown = rig.hw.last_shown().copied().unwrap();
    assert_eq!(shown.mode, DisplayMode::Temperatures);
    assert!(shown.sleep);
}

// ── Completion ────────────────────────────────────────────────

#[test]
fn finished_rice_hands_over_to_keep_warm_once() {
    let mut rig = Rig::new();
    rig.select_fast_rice_20();
    rig.hw.set_temps(96, 96);
    rig.press(Button::Start);

    assert!(rig.run_until(30 * MIN, |c| c.program_name() == "Keep Warm"));
    assert_eq!(
        rig.stage_changes(),
        [
            ("Start", "Soak"),
            ("Soak", "Heat"),
            ("Heat", "Cook"),
            ("Cook", "Vapor"),
            ("Vapor", "Rest"),
        ]
    );

    let finished = rig.sink.position(&CookerEvent::ProgramFinished).unwrap();
    let installed = rig
        .sink
        .position(&CookerEvent::ProgramInstalled("Keep Warm"))
        .unwrap();
    assert!(finished < installed);
    assert_eq!(rig.sink.events.last(), Some(&CookerEvent::ProgramStarted));

    let keep_warm = rig.cooker.program().unwrap();
    assert_eq!(keep_warm.kind(), ProgramKind::KeepWarm);
    assert!(!keep_warm.is_waiting());

    rig.run_for(10 * MIN);
    assert_eq!(rig.cooker.program_name(), "Keep Warm");
    assert_eq!(rig.sink.count(&CookerEvent::ProgramFinished), 1);

    // Pot is far above the keep-warm band.
    assert!(!rig.cooker.power());
    let shown = rig.hw.last_shown().copied().unwrap();
    assert_eq!(shown.mode, DisplayMode::Temperatures);
    assert!(!shown.sleep);
}

#[test]
fn keep_warm_reheats_cooling_pot() {
    let mut rig = Rig::new();
    rig.cooker
        .handle_command(CookerCommand::Select(ProgramKind::KeepWarm), 0, &mut rig.sink);
    rig.press(Button::Start);
    rig.hw.set_temps(55, 55);
    rig.tick();

    assert!(rig.cooker.power());
    assert_eq!(
        (rig.cooker.heater().min_target(), rig.cooker.heater().max_target()),
        (63, 67)
    );
    assert_eq!(rig.cooker.display_state(rig.now_ms).mode, DisplayMode::Temperatures);
}

// ── Cancel and program replacement ───────────────────────────

#[test]
fn cancel_stops_heating_immediately() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    rig.press(Button::Start);
    rig.hw.set_temps(20, 20);
    rig.tick();
    assert!(rig.cooker.power());

    rig.sink.clear();
    rig.press(Button::Cancel);
    assert!(!rig.cooker.power());
    assert_eq!(
        rig.sink.events,
        [CookerEvent::ProgramCancelled, CookerEvent::PowerChanged(false)]
    );
    assert!(rig.cooker.program().unwrap().is_waiting());

    rig.run_for(2 * MIN);
    assert!(!rig.cooker.power());
    assert!(!rig.hw.relay_on());
    assert_eq!(rig.stage(), "Wait");
}

#[test]
fn start_after_cancel_restarts_from_first_stage() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    rig.press(Button::Start);
    rig.hw.set_temps(60, 60);
    rig.tick();
    assert_eq!(rig.stage(), "Soak");

    rig.press(Button::Cancel);
    rig.tick();
    rig.press(Button::Start);
    assert_eq!(rig.stage(), "Start");
}

#[test]
fn set_program_resets_heater_but_keeps_thermal_mass() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    rig.press(Button::Start);
    rig.hw.set_temps(20, 20);
    rig.tick();
    assert!(rig.cooker.power());
    let mass = rig.cooker.heater().thermal_mass();

    rig.sink.clear();
    let keep_warm = Program::keep_warm(rig.cooker.config());
    rig.cooker.set_program(Some(keep_warm), &mut rig.sink);

    assert!(!rig.cooker.power());
    let heater = rig.cooker.heater();
    assert_eq!((heater.min_target(), heater.max_target()), (0, 0));
    assert_eq!(heater.thermal_mass(), mass);
    assert_eq!(
        rig.sink.events,
        [
            CookerEvent::ProgramInstalled("Keep Warm"),
            CookerEvent::PowerChanged(false)
        ]
    );
}

#[test]
fn timer_is_locked_while_running() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    rig.press(Button::Start);
    rig.press(Button::Timer);
    assert_eq!(rig.cooker.cooking_time_min(), 40);
    rig.press(Button::Select);
    assert_eq!(rig.cooker.program_name(), "Rice");
}

#[test]
fn manual_temperature_applies_to_waiting_rice() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    rig.cooker
        .handle_command(CookerCommand::SetCookingTemp(98), 0, &mut rig.sink);
    assert_eq!(rig.cooker.cooking_temp_c(), 98);
    assert_eq!(rig.cooker.program_name(), "Rice");
    assert_eq!(rig.sink.count(&CookerEvent::ProgramInstalled("Rice")), 2);
}

// ── Sensor faults ─────────────────────────────────────────────

#[test]
fn rejected_sample_keeps_previous_reading() {
    let mut rig = Rig::new();
    rig.hw.set_temps(30, 40);
    rig.tick();

    rig.hw.script(Ok(SensorSample::new(30, 200)));
    rig.tick();
    assert!(rig.sink.contains(&CookerEvent::SampleRejected(SensorError::OutOfRange {
        celsius: 200
    })));
    assert_eq!(rig.cooker.last_sample(), SensorSample::new(30, 40));
    assert_eq!(rig.cooker.heater().bottom_temperature(), 40);

    rig.sink.clear();
    rig.hw.script(Err(SensorError::Stale));
    rig.tick();
    assert!(rig.sink.events.is_empty());
}

#[test]
fn link_outage_is_reported_once() {
    let mut rig = Rig::new();
    rig.hw.steady = Err(SensorError::LinkDown);
    rig.run_for(5_000);
    assert_eq!(
        rig.sink
            .count(&CookerEvent::SampleRejected(SensorError::LinkDown)),
        1
    );

    rig.hw.set_temps(22, 23);
    rig.tick();
    assert_eq!(rig.cooker.last_sample(), SensorSample::new(22, 23));

    rig.hw.steady = Err(SensorError::LinkDown);
    rig.tick();
    assert_eq!(
        rig.sink
            .count(&CookerEvent::SampleRejected(SensorError::LinkDown)),
        2
    );
}

#[test]
fn relay_failure_is_not_fatal() {
    let mut rig = Rig::new();
    rig.press(Button::Select);
    rig.press(Button::Start);
    rig.hw.set_temps(20, 20);
    rig.hw.fail_relay = true;
    rig.tick();
    assert!(rig.cooker.power());
    assert!(rig.hw.relay_writes.is_empty());

    rig.hw.fail_relay = false;
    rig.tick();
    assert!(rig.hw.relay_on());
}
