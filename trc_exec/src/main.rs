//! Main vehicle executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Spawn the sample producer at the tick rate
//!     - Control loop, once per tick:
//!         - Wait on the synchronization gate for a fresh sensor frame
//!         - Line estimation and steering control processing
//!         - Motor driver execution
//!         - Status indicator update
//!         - Monitoring and telemetry
//!
//! The sample producer is the only other execution context; it hands each
//! frame to the control loop by value through the gate, so the two contexts
//! never alias shared data. While the control loop waits on the gate the
//! previous tick's duty demands remain in effect at the motors.
//!
//! # Modules
//!
//! All modules (e.g. `line_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use trc_lib::{
    data_store::{DataStore, SafeStopCause},
    line_ctrl, motor_driver,
    params::ExecParams,
    sampler,
    trace::TraceSensors,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, error, info, warn};
use std::env;
use std::time::Duration;

// Internal
use hw_if::indicator::{IndicatorInterface, IndicatorState};
use hw_if::mock::{MockActuators, MockIndicator};
use hw_if::sensor::SensorInterface;
use util::{
    archive::Archived,
    gate::{tick_gate, GateError},
    logger::{logger_init, LevelFilter},
    module::State,
    raise_error,
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("trc_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Tracer Line Following Vehicle Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: ExecParams =
        util::params::load("trc_exec.toml").wrap_err("Could not load exec params")?;
    exec_params
        .are_valid()
        .wrap_err("Exec params are invalid")?;

    let tick_period = Duration::from_secs_f64(exec_params.tick_period_s);
    let ticks_per_second = (1.0 / exec_params.tick_period_s).round() as u64;
    let watchdog_window = tick_period * exec_params.watchdog_missed_ticks;

    info!("Exec parameters loaded");

    // ---- INITIALISE SENSOR SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // The only accepted argument is the path to a sensor trace, which stands
    // in for the vehicle electronics on the bench.
    let sensors: Box<dyn SensorInterface + Send> = if args.len() == 2 {
        let trace = TraceSensors::from_path(&args[1]).wrap_err("Failed to load sensor trace")?;

        info!(
            "Loaded sensor trace \"{}\": {} frames ({:.03} s at the tick rate)\n",
            &args[1],
            trace.num_frames(),
            trace.num_frames() as f64 * exec_params.tick_period_s
        );

        Box::new(trace)
    } else {
        return Err(eyre!(
            "Expected the path to a sensor trace as the only argument, found {} arguments",
            args.len() - 1
        ));
    };

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.line_ctrl
        .init("line_ctrl.toml", &session)
        .wrap_err("Failed to initialise LineCtrl")?;
    info!("LineCtrl init complete");

    // Bench actuators and indicator: writes are recorded and logged, no
    // hardware is attached.
    ds.motor_driver
        .init(
            ("motor_driver.toml", Box::new(MockActuators::default())),
            &session,
        )
        .wrap_err("Failed to initialise MotorDriver")?;
    info!("MotorDriver init complete (bench actuators)");

    let mut indicator: Box<dyn IndicatorInterface> = Box::new(MockIndicator::default());

    info!("Module initialisation complete\n");

    // ---- START SAMPLE PRODUCER ----

    let (gate_tx, gate_rx) = tick_gate();

    let sampler_handle = sampler::spawn(sensors, gate_tx, tick_period);

    // ---- MAIN LOOP ----

    info!("Begining control loop\n");

    loop {
        // Wait for the producer to hand over the next frame. The watchdog
        // window covers several missed ticks before the producer is declared
        // stalled.
        let frame = match gate_rx.wait_timeout(watchdog_window) {
            Ok(f) => f,
            Err(GateError::Disconnected) => {
                info!("End of sensor data reached, stopping");
                ds.make_safe(SafeStopCause::SensorSourceExhausted);
                break;
            }
            Err(GateError::Timeout(w)) => {
                error!("No sensor frame within the watchdog window of {:?}", w);
                ds.make_safe(SafeStopCause::WatchdogTimeout);
                break;
            }
        };

        ds.cycle_start(ticks_per_second);

        // ---- CONTROL ALGORITHM PROCESSING ----

        // LineCtrl processing
        match ds.line_ctrl.proc(&frame) {
            Ok((o, r)) => {
                ds.line_ctrl_output = o;
                ds.line_ctrl_report = r;
            }
            Err(e) => warn!("Error during LineCtrl processing: {}", e),
        };

        // During the lost line grace period no new command is issued and the
        // previous demands stay in effect at the motors and the indicator.
        if ds.line_ctrl_report.cmd_issued {
            let input = motor_driver::InputData {
                safe_mode: ds.safe,
                cmd: ds.line_ctrl_output,
            };

            match ds.motor_driver.proc(&input) {
                Ok((o, r)) => {
                    ds.motor_dems = o;
                    ds.motor_driver_report = r;
                }
                Err(e) => warn!("Error during MotorDriver processing: {}", e),
            };

            if let Some(lamp) = ds.line_ctrl_report.lamp {
                indicator.set_indicator(lamp);
            }
        }

        // ---- MONITORING ----

        let overruns = gate_rx.overruns();
        if overruns > ds.gate_overruns {
            warn!(
                "Sampling gate overran, {} frame(s) dropped so far",
                overruns
            );
            ds.gate_overruns = overruns;
        }

        // ---- TELEMETRY ----

        if ds.num_ticks % exec_params.archive_decimation == 0 {
            if let Err(e) = ds.line_ctrl.write() {
                warn!("Could not write LineCtrl archives: {}", e);
            }
        }

        if ds.is_1hz_tick {
            info!(
                "Tick {}: error {}, dems L {} R {}",
                ds.num_ticks,
                ds.line_ctrl_report.error,
                ds.motor_dems.duty_left,
                ds.motor_dems.duty_right
            );
        }

        // Increment tick counter
        ds.num_ticks += 1;
    }

    // ---- SAFE STOP & SHUTDOWN ----

    // Zero both duty demands, the explicit safe stop
    let stop_input = motor_driver::InputData {
        safe_mode: true,
        cmd: line_ctrl::MotorCmd::default(),
    };
    match ds.motor_driver.proc(&stop_input) {
        Ok(_) => info!("Safe stop demands issued"),
        Err(e) => warn!("Could not issue safe stop demands: {}", e),
    };

    indicator.set_indicator(IndicatorState::Lost);

    // The producer is only joined on a clean exit; joining a stalled
    // producer would block the shutdown
    if ds.safe_cause != Some(SafeStopCause::WatchdogTimeout) {
        if sampler_handle.join().is_err() {
            raise_error!("Sampler thread panicked");
        }
    }

    // Save the run summary into the session
    session.save("run_summary.json", ds.run_summary());

    info!(
        "End of execution: {} ticks, {} gate overrun(s)",
        ds.num_ticks, ds.gate_overruns
    );

    // A watchdog expiry is a fatal configuration error, surface it as such
    match ds.safe_cause {
        Some(SafeStopCause::WatchdogTimeout) => {
            Err(eyre!("The sample producer stalled, watchdog expired"))
        }
        _ => Ok(()),
    }
}
