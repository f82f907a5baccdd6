//! Lost line calculations
//!
//! Runs while no line is detected. A short debounce grace period suppresses
//! reaction to single noisy samples; once it expires the vehicle spins in
//! place towards the direction the line was last confidently seen drifting.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use hw_if::indicator::IndicatorState;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LineCtrl {
    /// Perform the lost line command calculations.
    pub(super) fn calc_search(&mut self) -> MotorCmd {
        self.lost_line_counter += 1;

        self.report.line_lost = true;
        self.report.lost_ticks = self.lost_line_counter;

        if self.lost_line_counter > self.params.lost_line_delay {
            // Drive the side opposite to the turn: a rightward memory spins
            // the vehicle right by driving the left motor only. A direction
            // which was never established falls through to the leftward spin.
            let cmd = if self.last_valid_direction > 0 {
                MotorCmd {
                    left: self.params.speed_search,
                    right: 0,
                }
            } else {
                MotorCmd {
                    left: 0,
                    right: self.params.speed_search,
                }
            };

            self.report.searching = true;
            self.report.cmd_issued = true;
            self.report.lamp = Some(IndicatorState::Lost);

            cmd
        } else {
            // Grace period: issue nothing new this tick, the previous
            // demands stay in effect at the motors.
            self.report.cmd_issued = false;
            self.output.unwrap_or_default()
        }
    }
}
