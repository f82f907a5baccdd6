//! Line estimation and steering control module
//!
//! Each tick the module takes the latest sensor frame and produces the pair
//! of logical motor speed commands which keep the vehicle on the line. It
//! holds all of the controller's memory between ticks: the previous position
//! error for the derivative term, the run length of consecutive ticks on
//! which no line was seen, and the last confidently observed line offset
//! direction used to pick a search direction once the line is lost.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_estimate;
mod calc_search;
mod calc_track;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LineCtrl cyclic processing.
///
/// The control calculations are total over their bounded integer inputs, so
/// no processing error currently exists; the type satisfies the module
/// interface.
#[derive(Debug, thiserror::Error)]
pub enum LineCtrlError {}

/// Possible errors that can occur during LineCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Loaded parameters are invalid: {0}")]
    ParamsInvalid(ParamsError),

    #[error("Failed to initialise archives: {0}")]
    ArchInitError(String),
}
