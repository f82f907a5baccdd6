//! # Mock hardware implementations
//!
//! Stand-ins for the vehicle electronics, used by unit tests and by the bench
//! rig when no hardware is attached. Sensors serve queued frames, actuator
//! and indicator writes are recorded for inspection.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::VecDeque;

use log::debug;

use crate::indicator::{IndicatorInterface, IndicatorState};
use crate::motor::{ActuatorInterface, MotorDems, Side};
use crate::sensor::{Channel, SensorFrame, SensorInterface};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sensor mock which serves a queue of frames, one per tick.
///
/// A frame is latched on the first channel read of a tick and released once
/// all three channels have been read. The source reports itself exhausted
/// when no unserved frames remain; a looping mock never exhausts.
pub struct MockSensors {
    queue: VecDeque<SensorFrame>,
    current: Option<SensorFrame>,
    reads_of_current: usize,
    looping: bool,
}

/// Actuator mock recording every duty write.
#[derive(Default)]
pub struct MockActuators {
    /// The most recent demand pair, as written so far.
    pub dems: MotorDems,

    /// Complete history of `(side, duty)` writes.
    pub writes: Vec<(Side, u32)>,
}

/// Indicator mock recording the displayed state.
#[derive(Default)]
pub struct MockIndicator {
    /// The currently displayed state, `None` before the first write.
    pub state: Option<IndicatorState>,

    /// Complete history of displayed states.
    pub history: Vec<IndicatorState>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MockSensors {
    /// Create a mock serving the given frames in order, then exhausting.
    pub fn new(frames: Vec<SensorFrame>) -> Self {
        Self {
            queue: frames.into(),
            current: None,
            reads_of_current: 0,
            looping: false,
        }
    }

    /// Create a mock serving the same frame forever.
    pub fn constant(frame: SensorFrame) -> Self {
        let mut mock = Self::new(vec![frame]);
        mock.looping = true;
        mock
    }
}

impl SensorInterface for MockSensors {
    fn read_averaged(&mut self, channel: Channel) -> u16 {
        // Latch the next frame on the first channel read of a tick
        if self.current.is_none() {
            self.current = self.queue.pop_front();

            if self.looping {
                if let Some(f) = self.current {
                    self.queue.push_back(f);
                }
            }
        }

        // A drained queue keeps serving zeros
        let frame = self.current.unwrap_or_default();

        let value = match channel {
            Channel::Right => frame.right,
            Channel::Center => frame.center,
            Channel::Left => frame.left,
        };

        self.reads_of_current += 1;

        // All three channels sampled, release the frame
        if self.reads_of_current >= 3 {
            self.reads_of_current = 0;
            self.current = None;
        }

        value
    }

    fn exhausted(&self) -> bool {
        self.current.is_none() && self.queue.is_empty()
    }
}

impl ActuatorInterface for MockActuators {
    fn set_duty(&mut self, side: Side, duty: u32) {
        debug!("Mock actuator write: {:?} = {}", side, duty);

        match side {
            Side::Left => self.dems.duty_left = duty,
            Side::Right => self.dems.duty_right = duty,
        }

        self.writes.push((side, duty));
    }
}

impl IndicatorInterface for MockIndicator {
    fn set_indicator(&mut self, state: IndicatorState) {
        debug!("Mock indicator write: {:?}", state);

        self.state = Some(state);
        self.history.push(state);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
