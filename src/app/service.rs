//! Application service: the hexagonal core.
//!
//! [`RiceCooker`] owns the heater controller and at most one cooking
//! program.  It exposes a hardware-agnostic API; all I/O flows through
//! port traits injected at call sites.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                  │        RiceCooker        │
//! ActuatorPort ◀── │  Program · Heater        │ ──▶ DisplayPort
//!                  └──────────────────────────┘
//! ```
//!
//! Within one control tick the order is fixed: the program declares its
//! band, the heater decides, then the relay and display are updated.
//! Samples reach the heater on the faster sensor tick, so the program
//! always sees the newest one.

use log::{debug, error, info, warn};

use crate::config::CookerConfig;
use crate::control::heater::Heater;
use crate::error::SensorError;
use crate::program::{NO_PROGRAM_NAME, Program, ProgramKind};
use crate::sensors::{self, SensorSample};

use super::commands::{Button, CookerCommand, next_cooking_time};
use super::display::DisplayState;
use super::events::CookerEvent;
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// RiceCooker
// ───────────────────────────────────────────────────────────────

pub struct RiceCooker {
    config: CookerConfig,
    heater: Heater,
    program: Option<Program>,

    /// Menu entry used when a fresh program is installed.
    selected: ProgramKind,
    cooking_time_min: u8,
    cooking_temp_c: u8,

    /// Last accepted sample.
    sample: SensorSample,
    link_down: bool,
    /// Power state last reported through the sink.
    reported_power: bool,
    display: DisplayState,
    control_ticks: u64,
}

impl RiceCooker {
    /// Construct with no program installed and the heater off.
    pub fn new(config: CookerConfig) -> Self {
        Self {
            heater: Heater::new(&config),
            program: None,
            selected: ProgramKind::Rice,
            cooking_time_min: config.default_cooking_time_min,
            cooking_temp_c: config.default_cooking_temp_c,
            sample: SensorSample::default(),
            link_down: false,
            reported_power: false,
            display: DisplayState::default(),
            control_ticks: 0,
            config,
        }
    }

    // ── Program lifecycle ─────────────────────────────────────

    /// Replace the installed program.  The heater is reset and the old
    /// program dropped; `None` leaves the heater off.
    pub fn set_program(&mut self, program: Option<Program>, sink: &mut impl EventSink) {
        self.heater.reset();

        match &program {
            Some(p) => {
                info!("Setting program: {}", p.name());
                sink.emit(&CookerEvent::ProgramInstalled(p.name()));
            }
            None => {
                info!("Setting program: {}", NO_PROGRAM_NAME);
                sink.emit(&CookerEvent::ProgramCleared);
            }
        }

        self.program = program;
        self.report_power(sink);
    }

    /// Install a fresh program of `kind` using the current cooking time
    /// and temperature.  Ignored while a program is running.
    pub fn select(&mut self, kind: ProgramKind, now_ms: u64, sink: &mut impl EventSink) {
        if !self.can_select() {
            info!("Select {} ignored: {} is running", kind.name(), self.program_name());
            return;
        }
        self.selected = kind;
        let program = Program::from_kind(
            kind,
            &self.config,
            self.cooking_time_min,
            self.cooking_temp_c,
            now_ms,
        );
        self.set_program(Some(program), sink);
    }

    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        match self.program.as_mut() {
            Some(p) => {
                p.start(now_ms);
                info!("Program {} started", p.name());
                sink.emit(&CookerEvent::ProgramStarted);
            }
            None => debug!("Start ignored: no program selected"),
        }
    }

    /// Stop heating now and send the program back to waiting.
    pub fn cancel(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.heater.power_off();
        if let Some(p) = self.program.as_mut() {
            p.cancel(now_ms);
            info!("Program {} cancelled", p.name());
            sink.emit(&CookerEvent::ProgramCancelled);
        }
        self.report_power(sink);
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(&mut self, cmd: CookerCommand, now_ms: u64, sink: &mut impl EventSink) {
        match cmd {
            CookerCommand::Start => self.start(now_ms, sink),
            CookerCommand::Cancel => self.cancel(now_ms, sink),
            CookerCommand::Select(kind) => self.select(kind, now_ms, sink),
            CookerCommand::NextProgram => {
                // First press shows the current entry, later ones advance.
                let kind = if self.program.is_some() {
                    self.selected.next()
                } else {
                    self.selected
                };
                self.select(kind, now_ms, sink);
            }
            CookerCommand::NextCookingTime => {
                if !self.can_select() {
                    info!("Cooking time locked while {} is running", self.program_name());
                    return;
                }
                self.cooking_time_min = next_cooking_time(self.cooking_time_min);
                info!("Cooking time: {} min", self.cooking_time_min);
                self.reinstall_rice(now_ms, sink);
            }
            CookerCommand::SetCookingTemp(celsius) => {
                if !self.can_select() {
                    info!("Cooking temperature locked while {} is running", self.program_name());
                    return;
                }
                if !(self.config.min_plausible_c..=self.config.max_plausible_c).contains(&celsius) {
                    warn!("Cooking temperature {}\u{00b0}C rejected", celsius);
                    return;
                }
                self.cooking_temp_c = celsius;
                info!("Cooking temperature: {}\u{00b0}C", celsius);
                self.reinstall_rice(now_ms, sink);
            }
            CookerCommand::ClearProgram => self.set_program(None, sink),
        }
    }

    pub fn handle_button(&mut self, button: Button, now_ms: u64, sink: &mut impl EventSink) {
        info!("Button: {:?}", button);
        self.handle_command(button.command(), now_ms, sink);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Take the newest probe pair and feed it to the heater.
    ///
    /// A bad sample is dropped and the previous reading stays in effect.
    pub fn sensor_tick(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        let result = hw
            .read_sample()
            .and_then(|s| sensors::validate(s, &self.config));

        match result {
            Ok(sample) => {
                if self.link_down {
                    info!("MCU link up");
                    self.link_down = false;
                }
                self.sample = sample;
                self.heater.ingest(sample.top_c, sample.bottom_c);
            }
            Err(SensorError::Stale) => {
                debug!(
                    "No fresh sample, keeping top {}\u{00b0}C bottom {}\u{00b0}C",
                    self.sample.top_c, self.sample.bottom_c
                );
            }
            Err(SensorError::LinkDown) => {
                // Once per outage.
                if !self.link_down {
                    warn!("MCU link down");
                    self.link_down = true;
                    sink.emit(&CookerEvent::SampleRejected(SensorError::LinkDown));
                }
            }
            Err(e) => {
                warn!("Sample rejected: {}", e);
                sink.emit(&CookerEvent::SampleRejected(e));
            }
        }
    }

    /// Run one control cycle: program → heater → relay → display.
    pub fn control_tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> DisplayState {
        self.control_ticks += 1;

        if let Some(program) = self.program.as_mut() {
            let before = program.stage_name();
            program.step(&mut self.heater, now_ms);
            // A waiting program declares no band; the heater stays frozen.
            if !program.is_waiting() {
                self.heater.step(now_ms);
            }
            let after = program.stage_name();
            if before != after {
                sink.emit(&CookerEvent::StageChanged {
                    from: before,
                    to: after,
                });
            }
        } else {
            debug!("No program selected");
        }

        self.check_completion(now_ms, sink);
        self.report_power(sink);

        if let Err(e) = hw.set_heater(self.heater.power()) {
            error!("Heater relay: {}", e);
        }

        let display = self.display_state(now_ms);
        hw.show(&display);
        self.display = display;
        display
    }

    // ── Queries ───────────────────────────────────────────────

    /// Remaining time while the program reports one, raw probe readings
    /// otherwise.
    pub fn display_state(&self, now_ms: u64) -> DisplayState {
        let power = self.heater.power();
        match self.program.as_ref().and_then(|p| p.remaining_time(now_ms)) {
            Some(minutes) => DisplayState::remaining(power, minutes),
            None => DisplayState::temperatures(
                power,
                self.heater.top_temperature(),
                self.heater.bottom_temperature(),
                self.program.is_none(),
            ),
        }
    }

    pub fn program_name(&self) -> &'static str {
        self.program.as_ref().map_or(NO_PROGRAM_NAME, Program::name)
    }

    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    pub fn heater(&self) -> &Heater {
        &self.heater
    }

    pub fn power(&self) -> bool {
        self.heater.power()
    }

    pub fn selected(&self) -> ProgramKind {
        self.selected
    }

    pub fn cooking_time_min(&self) -> u8 {
        self.cooking_time_min
    }

    pub fn cooking_temp_c(&self) -> u8 {
        self.cooking_temp_c
    }

    pub fn last_sample(&self) -> SensorSample {
        self.sample
    }

    /// Display computed by the most recent control tick.
    pub fn display(&self) -> DisplayState {
        self.display
    }

    pub fn control_ticks(&self) -> u64 {
        self.control_ticks
    }

    pub fn config(&self) -> &CookerConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// No program, or the installed one is waiting for start.
    fn can_select(&self) -> bool {
        self.program.as_ref().is_none_or(Program::is_waiting)
    }

    /// Rebuild a waiting rice program so new settings take effect.
    fn reinstall_rice(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let kind = self.program.as_ref().map(Program::kind);
        if let Some(kind @ (ProgramKind::Rice | ProgramKind::FastRice)) = kind {
            self.select(kind, now_ms, sink);
        }
    }

    /// Replace a finished or aborted program.  Runs once per finish: the
    /// replacement is either nothing or keep-warm, which never finishes.
    fn check_completion(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let Some(program) = self.program.as_ref() else {
            return;
        };

        if let Some(fault) = program.fault() {
            error!("Program {} aborted: {}", program.name(), fault);
            sink.emit(&CookerEvent::ProgramAborted(fault));
            self.set_program(None, sink);
        } else if program.remaining_time(now_ms) == Some(0) {
            info!("Program {} finished, keeping warm", program.name());
            sink.emit(&CookerEvent::ProgramFinished);
            self.set_program(Some(Program::keep_warm(&self.config)), sink);
            self.start(now_ms, sink);
        }
    }

    fn report_power(&mut self, sink: &mut impl EventSink) {
        let power = self.heater.power();
        if power != self.reported_power {
            self.reported_power = power;
            sink.emit(&CookerEvent::PowerChanged(power));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::display::DisplayMode;

    #[derive(Default)]
    struct Recorder(Vec<CookerEvent>);

    impl EventSink for Recorder {
        fn emit(&mut self, event: &CookerEvent) {
            self.0.push(*event);
        }
    }

    #[test]
    fn starts_with_no_program() {
        let cooker = RiceCooker::new(CookerConfig::default());
        assert_eq!(cooker.program_name(), "None");
        assert!(!cooker.power());
        let d = cooker.display_state(0);
        assert_eq!(d.mode, DisplayMode::Temperatures);
        assert!(d.sleep);
    }

    #[test]
    fn select_installs_fresh_program() {
        let mut cooker = RiceCooker::new(CookerConfig::default());
        let mut sink = Recorder::default();
        cooker.select(ProgramKind::FastRice, 0, &mut sink);
        assert_eq!(cooker.program_name(), "Fast Rice");
        assert_eq!(sink.0, [CookerEvent::ProgramInstalled("Fast Rice")]);
    }

    #[test]
    fn select_is_ignored_while_running() {
        let mut cooker = RiceCooker::new(CookerConfig::default());
        let mut sink = Recorder::default();
        cooker.select(ProgramKind::Rice, 0, &mut sink);
        cooker.start(0, &mut sink);
        cooker.select(ProgramKind::KeepWarm, 10, &mut sink);
        assert_eq!(cooker.program_name(), "Rice");
        assert_eq!(cooker.selected(), ProgramKind::Rice);
    }

    #[test]
    fn cooking_temperature_outside_plausible_range_is_rejected() {
        let config = CookerConfig {
            max_plausible_c: 120,
            ..CookerConfig::default()
        };
        let mut cooker = RiceCooker::new(config);
        let mut sink = Recorder::default();
        cooker.handle_command(CookerCommand::SetCookingTemp(130), 0, &mut sink);
        assert_eq!(cooker.cooking_temp_c(), 100);
        cooker.handle_command(CookerCommand::SetCookingTemp(105), 0, &mut sink);
        assert_eq!(cooker.cooking_temp_c(), 105);
    }

    #[test]
    fn clear_program_reports_none() {
        let mut cooker = RiceCooker::new(CookerConfig::default());
        let mut sink = Recorder::default();
        cooker.select(ProgramKind::KeepWarm, 0, &mut sink);
        cooker.handle_command(CookerCommand::ClearProgram, 0, &mut sink);
        assert_eq!(cooker.program_name(), "None");
        assert_eq!(sink.0.last(), Some(&CookerEvent::ProgramCleared));
    }
}
