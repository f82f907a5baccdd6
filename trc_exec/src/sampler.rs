//! Sample producer
//!
//! A thread which acquires one sensor frame per tick at a fixed period and
//! hands it to the control loop through the synchronization gate. The
//! producer does no computation beyond data capture: estimation and control
//! stay on the consumer side of the gate.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

// Internal
use hw_if::sensor::{Channel, SensorFrame, SensorInterface};
use util::gate::{SignalResult, TickSender};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Spawn the sample producer thread.
///
/// Each tick the three channels are acquired in fixed order (right, center,
/// left) and the assembled frame is signalled through the gate. The thread
/// exits when the sensor source reports itself exhausted or the consumer
/// side of the gate is gone, dropping its gate handle so the consumer
/// observes the disconnection.
pub fn spawn(
    mut sensors: Box<dyn SensorInterface + Send>,
    gate: TickSender<SensorFrame>,
    period: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        info!("Sampler running with a period of {:?}", period);

        let mut next_tick = Instant::now() + period;

        loop {
            let frame = SensorFrame {
                right: sensors.read_averaged(Channel::Right),
                center: sensors.read_averaged(Channel::Center),
                left: sensors.read_averaged(Channel::Left),
            };

            if gate.signal(frame) == SignalResult::Disconnected {
                debug!("Control loop gone, sampler stopping");
                break;
            }

            if sensors.exhausted() {
                info!("Sensor source exhausted, sampler stopping");
                break;
            }

            // Deadline pacing: a late tick shortens the following sleep
            // instead of shifting the whole schedule
            let now = Instant::now();
            if next_tick > now {
                thread::sleep(next_tick - now);
            }
            next_tick += period;
        }
    })
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
