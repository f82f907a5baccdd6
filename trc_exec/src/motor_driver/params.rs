//! # Motor driver parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the motor driver.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// Gain applied to right side commands to compensate the physical
    /// asymmetry between the two motors. The left side is unscaled.
    pub right_motor_gain: f64,

    /// Lowest duty compare value a nominal demand saturates to.
    pub speed_min: i32,

    /// Highest duty compare value a nominal demand saturates to.
    pub speed_max: i32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the values of the loaded parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("right_motor_gain must be positive, got {0}")]
    NonPositiveGain(f64),

    #[error("Speed limits must satisfy 0 <= speed_min < speed_max, got [{0}, {1}]")]
    InvalidSpeedLimits(i32, i32),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Determine if the loaded parameter values are usable.
    pub fn are_valid(&self) -> Result<(), ParamsError> {
        if self.right_motor_gain <= 0.0 {
            return Err(ParamsError::NonPositiveGain(self.right_motor_gain));
        }
        if self.speed_min < 0 || self.speed_min >= self.speed_max {
            return Err(ParamsError::InvalidSpeedLimits(
                self.speed_min,
                self.speed_max,
            ));
        }

        Ok(())
    }
}

/// The default values mirror the shipped `params/motor_driver.toml`, tuned
/// for the reference vehicle.
impl Default for Params {
    fn default() -> Self {
        Params {
            right_motor_gain: 1.15,
            speed_min: 50,
            speed_max: 950,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
