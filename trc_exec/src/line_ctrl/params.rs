//! Parameters structure for LineCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for line estimation and steering control.
#[derive(Debug, Deserialize)]
pub struct Params {
    // ---- LINE DETECTION ----

    /// Minimum total reflected signal (sum of all three channels) below which
    /// the line surface is considered not detected.
    pub ir_threshold: i32,

    /// Per-channel reading below which a channel is considered to be seeing
    /// plain white floor. The line is considered lost when all three channels
    /// are below this limit (uniform surface, no contrast).
    pub ir_white_limit: i32,

    // ---- SPEEDS ----

    /// Base speed command on straights.
    pub speed_base: i32,

    /// Base speed command while cornering sharply.
    pub speed_turn_base: i32,

    /// Speed of the driven side while searching for a lost line.
    pub speed_search: i32,

    // ---- LOST LINE HANDLING ----

    /// Number of consecutive lost ticks tolerated before the search begins.
    pub lost_line_delay: u32,

    /// Position error magnitude above which the directional memory is
    /// updated.
    pub dir_threshold: i32,

    // ---- CONTROL GAINS ----

    /// Proportional gain.
    pub k_p: i32,

    /// Derivative gain.
    pub k_d: i32,

    /// Position error magnitude above which the cornering base speed is
    /// selected instead of the straight base speed.
    pub turn_error_threshold: i32,

    /// Position error magnitude above which the status indicator shows a
    /// veer rather than centered tracking.
    pub veer_threshold: i32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the values of the loaded parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("ir_threshold must be positive, got {0}")]
    NonPositiveIrThreshold(i32),

    #[error("Speed values must be non-negative")]
    NegativeSpeed,

    #[error("lost_line_delay must be at least 1")]
    ZeroLostLineDelay,

    #[error("Error thresholds must be non-negative")]
    NegativeThreshold,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Determine if the loaded parameter values are usable.
    pub fn are_valid(&self) -> Result<(), ParamsError> {
        if self.ir_threshold <= 0 {
            return Err(ParamsError::NonPositiveIrThreshold(self.ir_threshold));
        }
        if self.speed_base < 0 || self.speed_turn_base < 0 || self.speed_search < 0 {
            return Err(ParamsError::NegativeSpeed);
        }
        if self.lost_line_delay == 0 {
            return Err(ParamsError::ZeroLostLineDelay);
        }
        if self.dir_threshold < 0 || self.turn_error_threshold < 0 || self.veer_threshold < 0 {
            return Err(ParamsError::NegativeThreshold);
        }

        Ok(())
    }
}

/// The default values mirror the shipped `params/line_ctrl.toml`, tuned for
/// the reference vehicle.
impl Default for Params {
    fn default() -> Self {
        Params {
            ir_threshold: 500,
            ir_white_limit: 1500,
            speed_base: 650,
            speed_turn_base: 300,
            speed_search: 600,
            lost_line_delay: 5,
            dir_threshold: 200,
            k_p: 16,
            k_d: 30,
            turn_error_threshold: 300,
            veer_threshold: 200,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(Params::default().are_valid().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = Params::default();
        params.ir_threshold = 0;
        assert!(params.are_valid().is_err());

        let mut params = Params::default();
        params.speed_search = -1;
        assert!(params.are_valid().is_err());

        let mut params = Params::default();
        params.lost_line_delay = 0;
        assert!(params.are_valid().is_err());
    }
}
