//! Line position estimation calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::*;
use hw_if::sensor::SensorFrame;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The raw position estimate for one frame, before the error division.
///
/// The division is deferred until the line is known to be present, which also
/// guarantees a non-zero denominator (it is at least the detection
/// threshold).
pub(super) struct Estimate {
    /// `1000 * (right - left)`, the scaled left/right imbalance.
    pub numerator: i32,

    /// Sum of all three channels, the total reflected signal.
    pub denominator: i32,

    /// True if no line is detected in this frame.
    pub line_lost: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LineCtrl {
    /// Estimate the line position from one sensor frame.
    ///
    /// The line is considered lost either when the total reflected signal is
    /// too low (no line surface under the vehicle), or when every channel
    /// reads below the white limit (uniform high-reflectance floor with no
    /// contrast to lock onto).
    pub(super) fn estimate(&self, frame: &SensorFrame) -> Estimate {
        let numerator = 1000 * (frame.right as i32 - frame.left as i32);
        let denominator = frame.total();

        let all_white = (frame.right as i32) < self.params.ir_white_limit
            && (frame.center as i32) < self.params.ir_white_limit
            && (frame.left as i32) < self.params.ir_white_limit;

        let line_lost = denominator < self.params.ir_threshold || all_white;

        Estimate {
            numerator,
            denominator,
            line_lost,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
