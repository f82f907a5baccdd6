//! # Executable-level parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters governing the executable's cycle management.
#[derive(Debug, Deserialize)]
pub struct ExecParams {
    /// Target period of one tick of the sampling/control cycle.
    ///
    /// Units: seconds
    pub tick_period_s: f64,

    /// Number of consecutive missed ticks after which the control loop's
    /// watchdog declares the sample producer stalled and forces a safe stop.
    pub watchdog_missed_ticks: u32,

    /// Write controller archives every this-many ticks.
    pub archive_decimation: u64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the values of the loaded parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("tick_period_s must be positive, got {0}")]
    NonPositiveTickPeriod(f64),

    #[error("watchdog_missed_ticks must be at least 1")]
    ZeroWatchdogWindow,

    #[error("archive_decimation must be at least 1")]
    ZeroArchiveDecimation,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ExecParams {
    /// Determine if the loaded parameter values are usable.
    pub fn are_valid(&self) -> Result<(), ParamsError> {
        if self.tick_period_s <= 0.0 {
            return Err(ParamsError::NonPositiveTickPeriod(self.tick_period_s));
        }
        if self.watchdog_missed_ticks == 0 {
            return Err(ParamsError::ZeroWatchdogWindow);
        }
        if self.archive_decimation == 0 {
            return Err(ParamsError::ZeroArchiveDecimation);
        }

        Ok(())
    }
}

impl Default for ExecParams {
    fn default() -> Self {
        ExecParams {
            tick_period_s: 0.001,
            watchdog_missed_ticks: 50,
            archive_decimation: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
