//! # Motor actuator interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The two drive sides of the vehicle.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Left,
    Right,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Duty demands sent to the motor electronics, one per side.
///
/// Values are PWM compare values. Nominal demands sit inside the saturation
/// band of the motor driver; zero is the explicit safe-stop demand.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct MotorDems {
    /// Left side duty compare value
    pub duty_left: u32,

    /// Right side duty compare value
    pub duty_right: u32,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Duty-cycle output to the motor electronics.
///
/// Writes take effect before the next PWM period boundary and are assumed
/// always to succeed, so there is no return value.
pub trait ActuatorInterface {
    /// Set the duty compare value for one side.
    fn set_duty(&mut self, side: Side, duty: u32);
}
