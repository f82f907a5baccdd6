//! # Hardware interface crate.
//!
//! Provides the contracts between the control core and the vehicle
//! electronics. The core never touches peripherals directly: reflectance
//! sensing, motor drive and the status indicator are all reached through the
//! traits defined here, with the electronics themselves (ADC averaging, PWM
//! generation, LED wiring) behind the trait implementations.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Reflectance sensor interface and sample frame definitions
pub mod sensor;

/// Motor actuator interface and duty demand definitions
pub mod motor;

/// Status indicator interface
pub mod indicator;

/// Mock implementations of the hardware interfaces for tests and bench rigs
pub mod mock;
