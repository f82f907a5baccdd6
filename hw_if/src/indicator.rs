//! # Status indicator interface

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Coarse display states of the vehicle's status indicator.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum IndicatorState {
    /// The line is not detected
    Lost,

    /// Tracking, line weighted towards the left sensor
    VeerLeft,

    /// Tracking, line under the center sensor
    Centered,

    /// Tracking, line weighted towards the right sensor
    VeerRight,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Fire-and-forget status display output.
pub trait IndicatorInterface {
    /// Display the given state.
    fn set_indicator(&mut self, state: IndicatorState);
}
