//! Tracking calculations
//!
//! Runs while the line is detected: proportional-derivative correction on
//! the position error, directional memory updates, and two-level base speed
//! scheduling which slows the vehicle down for sharp turns.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::calc_estimate::Estimate;
use super::*;
use hw_if::indicator::IndicatorState;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LineCtrl {
    /// Perform the tracking command calculations for a detected line.
    pub(super) fn calc_track(&mut self, estimate: &Estimate) -> MotorCmd {
        self.lost_line_counter = 0;

        // Integer division truncates towards zero. Positive error means the
        // line is weighted towards the right sensor.
        let error = estimate.numerator / estimate.denominator;

        // Directional memory latches only confident excursions; it keeps the
        // last confident sign across small centered errors.
        if error > self.params.dir_threshold {
            self.last_valid_direction = 1;
        } else if error < -self.params.dir_threshold {
            self.last_valid_direction = -1;
        }

        let derivative = error - self.last_error;
        let correction = self.params.k_p * error + self.params.k_d * derivative;
        self.last_error = error;

        // Two-level base speed scheduling
        let speed_base = if error.abs() > self.params.turn_error_threshold {
            self.params.speed_turn_base
        } else {
            self.params.speed_base
        };

        self.report.error = error;
        self.report.correction = correction;
        self.report.cmd_issued = true;
        self.report.lamp = Some(self.classify_lamp(error));

        MotorCmd {
            left: speed_base + correction,
            right: speed_base - correction,
        }
    }

    /// Select the indicator state for a tracking tick.
    fn classify_lamp(&self, error: i32) -> IndicatorState {
        if error > self.params.veer_threshold {
            IndicatorState::VeerRight
        } else if error < -self.params.veer_threshold {
            IndicatorState::VeerLeft
        } else {
            IndicatorState::Centered
        }
    }
}
