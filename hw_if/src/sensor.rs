//! # Reflectance sensor interface
//!
//! The vehicle carries three downward-facing reflectance sensors (right,
//! center, left). Dark line surface reflects little light and produces high
//! readings, white floor produces low readings.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Highest value a single averaged conversion can produce (12 bit ADC).
pub const ADC_MAX: u16 = 4095;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The three sensor channels, in fixed acquisition order.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum Channel {
    Right,
    Center,
    Left,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One tick's worth of sensor readings.
///
/// Produced once per tick by the sample producer and handed to the control
/// loop by value, so the producer and consumer never alias the same frame.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SensorFrame {
    /// Right channel reading, in `[0, ADC_MAX]`
    pub right: u16,

    /// Center channel reading, in `[0, ADC_MAX]`
    pub center: u16,

    /// Left channel reading, in `[0, ADC_MAX]`
    pub left: u16,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Averaged analog acquisition of a single sensor channel.
///
/// Implementations block until one averaged conversion (the mean of 4 raw
/// conversions at the hardware layer) completes. There is no error path: a
/// conversion which does not complete within its polling window is a fault of
/// the electronics, not of this interface.
pub trait SensorInterface {
    /// Read one averaged conversion of the given channel.
    fn read_averaged(&mut self, channel: Channel) -> u16;

    /// True once the source can produce no further fresh data.
    ///
    /// Real electronics never run dry, bench sources (trace replay) do.
    fn exhausted(&self) -> bool {
        false
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Channel {
    /// The hardware channel index used by the ADC multiplexer.
    pub fn index(&self) -> usize {
        match self {
            Channel::Right => 0,
            Channel::Center => 1,
            Channel::Left => 2,
        }
    }
}

impl SensorFrame {
    /// Sum of all three readings, the total reflected signal.
    pub fn total(&self) -> i32 {
        self.right as i32 + self.center as i32 + self.left as i32
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_channel_indices() {
        assert_eq!(Channel::Right.index(), 0);
        assert_eq!(Channel::Center.index(), 1);
        assert_eq!(Channel::Left.index(), 2);
    }

    #[test]
    fn test_frame_total() {
        let frame = SensorFrame {
            right: 2000,
            center: 1800,
            left: 100,
        };

        assert_eq!(frame.total(), 3900);
    }
}
