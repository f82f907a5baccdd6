//! # Motor driver module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;
use thiserror::Error;

// Internal
use super::{Params, ParamsError};
use crate::line_ctrl::MotorCmd;
use hw_if::motor::{ActuatorInterface, MotorDems, Side};
use util::{maths::clamp, module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Motor driver module state
pub struct MotorDriver {
    params: Params,

    report: StatusReport,

    actuator: Option<Box<dyn ActuatorInterface>>,
}

/// Input data to the motor driver.
#[derive(Default)]
pub struct InputData {
    /// When true the nominal mapping is bypassed and both sides are demanded
    /// to zero duty.
    pub safe_mode: bool,

    /// The speed commands to execute.
    pub cmd: MotorCmd,
}

/// Status report for motor driver processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True if the left demand was saturated.
    pub duty_left_limited: bool,

    /// True if the right demand was saturated.
    pub duty_right_limited: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during motor driver initialisation.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Loaded parameters are invalid: {0}")]
    ParamsInvalid(ParamsError),
}

/// Possible errors that can occur during motor driver processing.
#[derive(Debug, Error)]
pub enum ProcError {
    #[error("No actuator interface attached, has the module been initialised?")]
    NoActuator,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MotorDriver {
    fn default() -> Self {
        MotorDriver {
            params: Params::default(),
            report: StatusReport::default(),
            actuator: None,
        }
    }
}

impl MotorDriver {
    /// Build a driver with the given parameters and actuator interface,
    /// without loading a parameter file.
    ///
    /// Used by bench rigs and tests which run outside a session.
    pub fn with_actuator(params: Params, actuator: Box<dyn ActuatorInterface>) -> Self {
        MotorDriver {
            params,
            report: StatusReport::default(),
            actuator: Some(actuator),
        }
    }

    /// Map a pair of logical speed commands onto duty demands.
    ///
    /// The right side is scaled by the hardware gain (truncating towards
    /// zero), then both sides are independently saturated into the
    /// `[speed_min, speed_max]` band.
    pub fn map_dems(&self, cmd: &MotorCmd) -> (MotorDems, StatusReport) {
        let left_raw = cmd.left as i64;
        let right_raw = (cmd.right as f64 * self.params.right_motor_gain) as i64;

        let left = clamp(left_raw, self.params.speed_min as i64, self.params.speed_max as i64);
        let right = clamp(
            right_raw,
            self.params.speed_min as i64,
            self.params.speed_max as i64,
        );

        let report = StatusReport {
            duty_left_limited: left != left_raw,
            duty_right_limited: right != right_raw,
        };

        (
            MotorDems {
                duty_left: left as u32,
                duty_right: right as u32,
            },
            report,
        )
    }
}

impl State for MotorDriver {
    type InitData = (&'static str, Box<dyn ActuatorInterface>);
    type InitError = InitError;

    type InputData = InputData;
    type OutputData = MotorDems;
    type StatusReport = StatusReport;
    type ProcError = ProcError;

    /// Initialise the motor driver.
    ///
    /// Expected init data is the path to the parameter file and the actuator
    /// interface the duty demands are issued through.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), Self::InitError> {
        let (params_path, actuator) = init_data;

        // Load and validate the parameters
        self.params = params::load(params_path).map_err(InitError::ParamLoadError)?;
        self.params.are_valid().map_err(InitError::ParamsInvalid)?;

        self.actuator = Some(actuator);

        Ok(())
    }

    /// Perform cyclic processing of the motor driver.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        self.report = StatusReport::default();

        let dems = if input_data.safe_mode {
            // Safe stop demand, below the nominal saturation band
            MotorDems {
                duty_left: 0,
                duty_right: 0,
            }
        } else {
            let (dems, report) = self.map_dems(&input_data.cmd);
            self.report = report;
            dems
        };

        let actuator = self.actuator.as_mut().ok_or(ProcError::NoActuator)?;
        actuator.set_duty(Side::Left, dems.duty_left);
        actuator.set_duty(Side::Right, dems.duty_right);

        trace!("MotorDriver dems: {:?}", dems);

        Ok((dems, self.report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
