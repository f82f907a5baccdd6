//! # Motor driver module
//!
//! This module interfaces with the vehicle's drive motors. It takes in a
//! `line_ctrl::MotorCmd` struct with the logical speed commands, applies the
//! hardware gain correction and saturation, and issues the resulting duty
//! demands through the actuator interface.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod state;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;
