//! Sensor trace replay
//!
//! Serves recorded sensor frames in place of the vehicle electronics, so the
//! full control loop can be driven on the bench. A trace is a CSV file with
//! a `right,center,left` header and one row of raw channel readings per
//! tick.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::path::Path;
use thiserror::Error;

// Internal
use hw_if::mock::MockSensors;
use hw_if::sensor::{Channel, SensorFrame, SensorInterface, ADC_MAX};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A sensor source replaying a recorded trace, one frame per tick.
///
/// Frames are served in file order and the source reports itself exhausted
/// once the last row has been consumed.
pub struct TraceSensors {
    inner: MockSensors,
    num_frames: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a sensor trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Cannot read the trace file: {0}")]
    ReadError(#[from] csv::Error),

    #[error("The trace file contains no frames")]
    Empty,

    #[error("Frame {0} contains a reading above the ADC resolution of {1}: {2:?}")]
    ReadingOutOfRange(usize, u16, SensorFrame),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TraceSensors {
    /// Load a trace from the given CSV file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TraceError> {
        let mut reader = csv::Reader::from_path(path)?;
        Self::from_reader(&mut reader)
    }

    /// Number of frames in the trace.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn from_reader<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Self, TraceError> {
        let frames = reader
            .deserialize()
            .collect::<Result<Vec<SensorFrame>, csv::Error>>()?;

        if frames.is_empty() {
            return Err(TraceError::Empty);
        }

        for (i, frame) in frames.iter().enumerate() {
            if frame.right > ADC_MAX || frame.center > ADC_MAX || frame.left > ADC_MAX {
                return Err(TraceError::ReadingOutOfRange(i, ADC_MAX, *frame));
            }
        }

        Ok(Self {
            num_frames: frames.len(),
            inner: MockSensors::new(frames),
        })
    }
}

impl SensorInterface for TraceSensors {
    fn read_averaged(&mut self, channel: Channel) -> u16 {
        self.inner.read_averaged(channel)
    }

    fn exhausted(&self) -> bool {
        self.inner.exhausted()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn trace_from_str(data: &str) -> Result<TraceSensors, TraceError> {
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        TraceSensors::from_reader(&mut reader)
    }

    #[test]
    fn test_load_and_replay() {
        let mut trace = trace_from_str(
            "right,center,left\n\
             2000,1800,100\n\
             50,50,50\n",
        )
        .unwrap();

        assert_eq!(trace.num_frames(), 2);

        // Fixed acquisition order: right, center, left
        assert_eq!(trace.read_averaged(Channel::Right), 2000);
        assert_eq!(trace.read_averaged(Channel::Center), 1800);
        assert_eq!(trace.read_averaged(Channel::Left), 100);
        assert!(!trace.exhausted());

        assert_eq!(trace.read_averaged(Channel::Right), 50);
        assert_eq!(trace.read_averaged(Channel::Center), 50);
        assert_eq!(trace.read_averaged(Channel::Left), 50);
        assert!(trace.exhausted());
    }

    #[test]
    fn test_empty_trace_rejected() {
        assert!(matches!(
            trace_from_str("right,center,left\n"),
            Err(TraceError::Empty)
        ));
    }

    #[test]
    fn test_malformed_trace_rejected() {
        assert!(matches!(
            trace_from_str("right,center,left\n2000,oops,100\n"),
            Err(TraceError::ReadError(_))
        ));
    }

    #[test]
    fn test_out_of_range_reading_rejected() {
        assert!(matches!(
            trace_from_str("right,center,left\n2000,1800,100\n2000,4096,100\n"),
            Err(TraceError::ReadingOutOfRange(1, _, _))
        ));
    }
}
