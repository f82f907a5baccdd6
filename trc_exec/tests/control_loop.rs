//! End-to-end control loop tests
//!
//! Drive the full pipeline (estimation, steering control, motor driver)
//! against mock hardware, the way the executable wires it up.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::Duration;

use hw_if::indicator::IndicatorState;
use hw_if::mock::{MockActuators, MockSensors};
use hw_if::motor::MotorDems;
use hw_if::sensor::SensorFrame;
use trc_lib::line_ctrl::{self, LineCtrl};
use trc_lib::motor_driver::{self, MotorDriver};
use trc_lib::sampler;
use util::gate::tick_gate;
use util::module::State;

// ---------------------------------------------------------------------------
// HELPERS
// ---------------------------------------------------------------------------

struct Pipeline {
    line_ctrl: LineCtrl,
    motor_driver: MotorDriver,
    dems: MotorDems,
    lamp: Option<IndicatorState>,
}

impl Pipeline {
    fn new() -> Self {
        Pipeline {
            line_ctrl: LineCtrl::with_params(line_ctrl::Params::default()),
            motor_driver: MotorDriver::with_actuator(
                motor_driver::Params::default(),
                Box::new(MockActuators::default()),
            ),
            dems: MotorDems::default(),
            lamp: None,
        }
    }

    /// One tick of the consumer side: control processing, and motor and
    /// indicator writes only when a new command was issued.
    fn tick(&mut self, frame: SensorFrame) -> line_ctrl::StatusReport {
        let (cmd, report) = self.line_ctrl.proc(&frame).unwrap();

        if report.cmd_issued {
            let input = motor_driver::InputData {
                safe_mode: false,
                cmd,
            };
            let (dems, _) = self.motor_driver.proc(&input).unwrap();
            self.dems = dems;

            if let Some(lamp) = report.lamp {
                self.lamp = Some(lamp);
            }
        }

        report
    }
}

fn frame(right: u16, center: u16, left: u16) -> SensorFrame {
    SensorFrame {
        right,
        center,
        left,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

/// A hard rightward excursion saturates the demands: full speed on the left
/// side, minimum on the gain-corrected right side.
#[test]
fn test_sharp_turn_saturates_demands() {
    let mut pipeline = Pipeline::new();

    let report = pipeline.tick(frame(2000, 1800, 100));

    assert_eq!(report.error, 487);
    assert_eq!(
        pipeline.dems,
        MotorDems {
            duty_left: 950,
            duty_right: 50
        }
    );
    assert_eq!(pipeline.lamp, Some(IndicatorState::VeerRight));
}

/// Gentle centered tracking keeps both demands inside the saturation band,
/// with the right side sitting above the left by the hardware gain.
#[test]
fn test_centered_tracking_demands() {
    let mut pipeline = Pipeline::new();

    // error = 100000 / 4700 = 21, correction = 16*21 + 30*21 = 966
    let report = pipeline.tick(frame(1600, 1600, 1500));

    assert_eq!(report.error, 21);
    assert_eq!(report.correction, 966);

    // left = 650 + 966 saturates to 950; right = 650 - 966 saturates to 50
    assert_eq!(
        pipeline.dems,
        MotorDems {
            duty_left: 950,
            duty_right: 50
        }
    );

    // A second identical frame has no derivative contribution:
    // correction = 16*21 = 336, left = 986 -> 950, right = 314 * 1.15 = 361
    let report = pipeline.tick(frame(1600, 1600, 1500));
    assert_eq!(report.correction, 336);
    assert_eq!(
        pipeline.dems,
        MotorDems {
            duty_left: 950,
            duty_right: 361
        }
    );
    assert_eq!(pipeline.lamp, Some(IndicatorState::Centered));
}

/// Losing the line holds the previous demands for the grace period, then
/// engages the search towards the remembered direction, and recovery
/// returns to tracking immediately.
#[test]
fn test_lost_line_cycle() {
    let mut pipeline = Pipeline::new();

    // Establish rightward tracking
    pipeline.tick(frame(2000, 1800, 100));
    let tracking_dems = pipeline.dems;
    let tracking_lamp = pipeline.lamp;

    // Five lost ticks: grace period, demands and lamp untouched
    for _ in 0..5 {
        let report = pipeline.tick(frame(50, 50, 50));
        assert!(report.line_lost);
        assert!(!report.searching);
        assert_eq!(pipeline.dems, tracking_dems);
        assert_eq!(pipeline.lamp, tracking_lamp);
    }

    // Sixth lost tick: search engages rightwards, left side driven at the
    // search speed and the right side held at the lower saturation bound
    let report = pipeline.tick(frame(50, 50, 50));
    assert!(report.searching);
    assert_eq!(
        pipeline.dems,
        MotorDems {
            duty_left: 600,
            duty_right: 50
        }
    );
    assert_eq!(pipeline.lamp, Some(IndicatorState::Lost));

    // Recovery is immediate, no debounce on the way back
    let report = pipeline.tick(frame(1600, 1600, 1500));
    assert!(!report.line_lost);
    assert!(!report.searching);
    assert!(report.cmd_issued);
    assert_ne!(pipeline.lamp, Some(IndicatorState::Lost));
}

/// A short loss never reaches the search, the debounce absorbs it.
#[test]
fn test_brief_loss_absorbed() {
    let mut pipeline = Pipeline::new();

    pipeline.tick(frame(1600, 1600, 1500));

    let report = pipeline.tick(frame(50, 50, 50));
    assert!(report.line_lost);
    assert!(!report.searching);

    let report = pipeline.tick(frame(1600, 1600, 1500));
    assert!(!report.line_lost);
    assert_eq!(report.lost_ticks, 0);
}

/// The sampler delivers frames through the gate to the consumer side; every
/// produced frame is either processed or counted as an overrun.
#[test]
fn test_sampler_feeds_pipeline() {
    let frames = vec![
        frame(1600, 1600, 1500),
        frame(2000, 1800, 100),
        frame(50, 50, 50),
    ];

    let (tx, rx) = tick_gate();
    let handle = sampler::spawn(
        Box::new(MockSensors::new(frames.clone())),
        tx,
        Duration::from_millis(1),
    );

    let mut pipeline = Pipeline::new();
    let mut processed = 0u64;

    while let Ok(f) = rx.wait() {
        pipeline.tick(f);
        processed += 1;
    }

    handle.join().unwrap();

    assert!(processed > 0);
    assert_eq!(processed + rx.overruns(), frames.len() as u64);
}
