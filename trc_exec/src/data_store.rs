//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use hw_if::motor::MotorDems;
use log::warn;
use serde::Serialize;

use crate::{line_ctrl, motor_driver};

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Gives the reason the vehicle has been commanded to a safe stop
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize)]
pub enum SafeStopCause {
    /// The watchdog on the sampling gate expired
    WatchdogTimeout,

    /// The sensor source ran out of data (bench trace reached its end)
    SensorSourceExhausted,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of ticks already executed
    pub num_ticks: u64,

    /// True if this tick falls on a 1Hz boundary
    pub is_1hz_tick: bool,

    // Safe stop variables
    /// Determines if the vehicle is being held in a safe stop.
    pub safe: bool,

    /// Gives the reason for the safe stop.
    pub safe_cause: Option<SafeStopCause>,

    // LineCtrl
    pub line_ctrl: line_ctrl::LineCtrl,
    pub line_ctrl_output: line_ctrl::MotorCmd,
    pub line_ctrl_report: line_ctrl::StatusReport,

    // MotorDriver
    pub motor_driver: motor_driver::MotorDriver,
    pub motor_dems: MotorDems,
    pub motor_driver_report: motor_driver::StatusReport,

    // Monitoring counters
    /// Number of frames dropped at the sampling gate so far
    pub gate_overruns: u64,
}

/// Summary of a run, saved into the session directory at shutdown.
#[derive(Serialize)]
pub struct RunSummary {
    pub num_ticks: u64,
    pub gate_overruns: u64,
    pub safe: bool,
    pub safe_cause: Option<SafeStopCause>,
    pub final_report: line_ctrl::StatusReport,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform the start of tick updates.
    pub fn cycle_start(&mut self, ticks_per_second: u64) {
        self.is_1hz_tick = self.num_ticks % ticks_per_second == 0;
    }

    /// Command a safe stop with the given cause.
    pub fn make_safe(&mut self, cause: SafeStopCause) {
        if !self.safe {
            warn!("Safe stop requested, cause: {:?}", cause);
            self.safe = true;
            self.safe_cause = Some(cause);
        }
    }

    /// Build the shutdown summary for this run.
    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            num_ticks: self.num_ticks,
            gate_overruns: self.gate_overruns,
            safe: self.safe,
            safe_cause: self.safe_cause,
            final_report: self.line_ctrl_report,
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
    fn test_make_safe_keeps_root_cause() {
        let mut ds = DataStore::default();

        ds.make_safe(SafeStopCause::WatchdogTimeout);
        ds.make_safe(SafeStopCause::SensorSourceExhausted);

        assert!(ds.safe);
        assert_eq!(ds.safe_cause, Some(SafeStopCause::WatchdogTimeout));
    }

    #[test]
    fn test_1hz_boundary() {
        let mut ds = DataStore::default();

        ds.cycle_start(1000);
        assert!(ds.is_1hz_tick);

        ds.num_ticks = 999;
        ds.cycle_start(1000);
        assert!(!ds.is_1hz_tick);

        ds.num_ticks = 2000;
        ds.cycle_start(1000);
        assert!(ds.is_1hz_tick);
    }
}
