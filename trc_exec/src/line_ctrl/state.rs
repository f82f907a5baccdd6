//! Implementations for the LineCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;

// Internal
use super::{InitError, LineCtrlError, Params};
use hw_if::indicator::IndicatorState;
use hw_if::sensor::SensorFrame;
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Line estimation and steering control module state
#[derive(Default)]
pub struct LineCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
    arch_output: Archiver,

    /// Previous tick's signed position error, for the derivative term.
    pub(crate) last_error: i32,

    /// Run length of consecutive ticks on which no line was detected.
    pub(crate) lost_line_counter: u32,

    /// Sign of the most recent confident position error: +1 if the line was
    /// last seen drifting towards the right sensor, -1 towards the left, 0 if
    /// never established.
    pub(crate) last_valid_direction: i8,

    /// The command emitted on the previous tick, held during the lost line
    /// grace period.
    pub(crate) output: Option<MotorCmd>,
}

/// Output command from LineCtrl that the motor driver must execute.
///
/// Values are logical speed commands, before hardware gain correction and
/// saturation.
#[derive(Clone, Copy, Serialize, Debug, Default, Eq, PartialEq)]
pub struct MotorCmd {
    /// Left side speed command
    pub left: i32,

    /// Right side speed command
    pub right: i32,
}

/// Status report for LineCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// True if the line was not detected on this tick.
    pub line_lost: bool,

    /// True if the controller is actively spinning in search of the line.
    pub searching: bool,

    /// True if a new command was issued this tick. False during the lost
    /// line grace period, when the previous demands stay in effect.
    pub cmd_issued: bool,

    /// Current run length of consecutive lost ticks.
    pub lost_ticks: u32,

    /// The signed position error. Positive means the line is weighted
    /// towards the right sensor. Zero while the line is lost.
    pub error: i32,

    /// The correction applied on top of the base speed.
    pub correction: i32,

    /// Status indicator state for this tick, `None` if the indicator is to
    /// be left unchanged.
    pub lamp: Option<IndicatorState>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LineCtrl {
    /// Build a controller with the given parameters, without archiving.
    ///
    /// Used by bench rigs and tests which run outside a session.
    pub fn with_params(params: Params) -> Self {
        LineCtrl {
            params,
            ..Default::default()
        }
    }
}

impl State for LineCtrl {
    type InitData = &'static str;
    type InitError = InitError;

    type InputData = SensorFrame;
    type OutputData = MotorCmd;
    type StatusReport = StatusReport;
    type ProcError = LineCtrlError;

    /// Initialise the LineCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), Self::InitError> {
        // Load and validate the parameters
        self.params = params::load(init_data).map_err(InitError::ParamLoadError)?;
        self.params.are_valid().map_err(InitError::ParamsInvalid)?;

        // Create the arch folder for line_ctrl
        let mut arch_path = session.arch_root.clone();
        arch_path.push("line_ctrl");
        std::fs::create_dir_all(arch_path).map_err(|e| InitError::ArchInitError(e.to_string()))?;

        // Initialise the archivers
        self.arch_report = Archiver::from_path(session, "line_ctrl/status_report.csv")
            .map_err(|e| InitError::ArchInitError(e.to_string()))?;
        self.arch_output = Archiver::from_path(session, "line_ctrl/output.csv")
            .map_err(|e| InitError::ArchInitError(e.to_string()))?;

        Ok(())
    }

    /// Perform cyclic processing of line estimation and steering control.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let estimate = self.estimate(input_data);

        let output = if estimate.line_lost {
            self.calc_search()
        } else {
            self.calc_track(&estimate)
        };

        trace!(
            "LineCtrl output:\n    cmd: {:?}\n    report: {:?}",
            output,
            self.report
        );

        // Update the output in self
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl Archived for LineCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output.unwrap_or_default())?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn frame(right: u16, center: u16, left: u16) -> SensorFrame {
        SensorFrame {
            right,
            center,
            left,
        }
    }

    fn proc(ctrl: &mut LineCtrl, f: SensorFrame) -> (MotorCmd, StatusReport) {
        ctrl.proc(&f).unwrap()
    }

    /// Readings heavily weighted to the right sensor produce a saturating
    /// rightward correction.
    #[test]
    fn test_sharp_right_correction() {
        let mut ctrl = LineCtrl::default();

        let (cmd, report) = proc(&mut ctrl, frame(2000, 1800, 100));

        // numerator = 1000 * (2000 - 100), denominator = 3900
        assert_eq!(report.error, 487);
        assert!(!report.line_lost);
        assert!(report.cmd_issued);
        assert_eq!(report.lamp, Some(IndicatorState::VeerRight));

        // correction = 16*487 + 30*(487 - 0)
        assert_eq!(report.correction, 22402);

        // |error| > 300 selects the cornering base speed of 300
        assert_eq!(cmd.left, 300 + 22402);
        assert_eq!(cmd.right, 300 - 22402);

        // Directional memory latches the rightward excursion
        assert_eq!(ctrl.last_valid_direction, 1);
        assert_eq!(ctrl.last_error, 487);
    }

    /// Position error division truncates towards zero for both signs.
    #[test]
    fn test_error_division_truncates_towards_zero() {
        let mut ctrl = LineCtrl::default();

        // 1900000 / 3900 = 487.17...
        let (_, report) = proc(&mut ctrl, frame(2000, 1800, 100));
        assert_eq!(report.error, 487);

        let mut ctrl = LineCtrl::default();

        // -1900000 / 3900 = -487.17...
        let (_, report) = proc(&mut ctrl, frame(100, 1800, 2000));
        assert_eq!(report.error, -487);
    }

    /// The cornering base speed engages strictly above the turn error
    /// threshold. The base can be recovered from a command pair as
    /// (left + right) / 2, since the corrections cancel.
    #[test]
    fn test_turn_base_speed_selection() {
        let mut ctrl = LineCtrl::default();

        // error = 900000 / 3000 = 300 exactly: straight base speed
        let (cmd, report) = proc(&mut ctrl, frame(1800, 300, 900));
        assert_eq!(report.error, 300);
        assert_eq!(cmd.left + cmd.right, 2 * 650);

        // error = 1000000 / 3300 = 303: cornering base speed
        let mut ctrl = LineCtrl::default();
        let (cmd, report) = proc(&mut ctrl, frame(2000, 300, 1000));
        assert_eq!(report.error, 303);
        assert_eq!(cmd.left + cmd.right, 2 * 300);
    }

    /// Small centered errors leave the directional memory untouched.
    #[test]
    fn test_directional_memory_idempotent_when_centered() {
        let mut ctrl = LineCtrl::default();

        // Establish a confident leftward excursion
        let (_, report) = proc(&mut ctrl, frame(100, 1800, 2000));
        assert!(report.error < -200);
        assert_eq!(ctrl.last_valid_direction, -1);

        // A run of near-centered ticks must not move it
        for _ in 0..10 {
            let (_, report) = proc(&mut ctrl, frame(1600, 1600, 1500));
            assert!(report.error.abs() <= 200);
            assert_eq!(ctrl.last_valid_direction, -1);
        }
    }

    /// The line lost predicate holds for low total signal and for a uniform
    /// white surface, and releases as soon as one channel sees contrast.
    #[test]
    fn test_line_lost_predicate() {
        let mut ctrl = LineCtrl::default();

        // Total signal below the detection threshold
        let (_, report) = proc(&mut ctrl, frame(50, 50, 50));
        assert!(report.line_lost);

        // Uniform white: every channel below the white limit even though the
        // total is well above the detection threshold
        let mut ctrl = LineCtrl::default();
        let (_, report) = proc(&mut ctrl, frame(1400, 1400, 1400));
        assert!(report.line_lost);

        // One channel at the white limit is enough contrast
        let mut ctrl = LineCtrl::default();
        let (_, report) = proc(&mut ctrl, frame(1500, 1400, 1400));
        assert!(!report.line_lost);
    }

    /// The lost tick counter is a run length: it increments on each
    /// consecutive lost tick and resets on the first detected tick.
    #[test]
    fn test_lost_counter_run_length() {
        let mut ctrl = LineCtrl::default();

        let (_, report) = proc(&mut ctrl, frame(50, 50, 50));
        assert_eq!(report.lost_ticks, 1);

        let (_, report) = proc(&mut ctrl, frame(50, 50, 50));
        assert_eq!(report.lost_ticks, 2);

        let (_, report) = proc(&mut ctrl, frame(2000, 1800, 100));
        assert!(!report.line_lost);
        assert_eq!(report.lost_ticks, 0);
        assert_eq!(ctrl.lost_line_counter, 0);
    }

    /// During the grace period the previous command is returned unchanged
    /// and flagged as not newly issued, so the motors coast on the prior
    /// demands. The indicator is left unchanged too.
    #[test]
    fn test_grace_period_holds_previous_command() {
        let mut ctrl = LineCtrl::default();

        let (tracking_cmd, _) = proc(&mut ctrl, frame(2000, 1800, 100));

        for tick in 1..=5u32 {
            let (cmd, report) = proc(&mut ctrl, frame(50, 50, 50));
            assert_eq!(report.lost_ticks, tick);
            assert!(report.line_lost);
            assert!(!report.searching);
            assert!(!report.cmd_issued);
            assert_eq!(report.lamp, None);
            assert_eq!(cmd, tracking_cmd);
        }

        // The derivative memory is untouched while the line is lost
        assert_eq!(ctrl.last_error, 487);
    }

    /// After the grace period expires the controller spins towards the last
    /// confident direction.
    #[test]
    fn test_search_engages_after_grace_period() {
        let mut ctrl = LineCtrl::default();

        // Line last seen drifting right
        proc(&mut ctrl, frame(2000, 1800, 100));
        assert_eq!(ctrl.last_valid_direction, 1);

        for _ in 0..5 {
            let (_, report) = proc(&mut ctrl, frame(50, 50, 50));
            assert!(!report.searching);
        }

        // Sixth lost tick: search engages, driving the left side only
        let (cmd, report) = proc(&mut ctrl, frame(50, 50, 50));
        assert!(report.searching);
        assert!(report.cmd_issued);
        assert_eq!(report.lamp, Some(IndicatorState::Lost));
        assert_eq!(cmd, MotorCmd { left: 600, right: 0 });
    }

    /// A leftward directional memory mirrors the search command.
    #[test]
    fn test_search_direction_mirrored() {
        let mut ctrl = LineCtrl::default();

        proc(&mut ctrl, frame(100, 1800, 2000));
        assert_eq!(ctrl.last_valid_direction, -1);

        for _ in 0..6 {
            proc(&mut ctrl, frame(50, 50, 50));
        }

        let (cmd, report) = proc(&mut ctrl, frame(50, 50, 50));
        assert!(report.searching);
        assert_eq!(cmd, MotorCmd { left: 0, right: 600 });
    }

    /// With no confident direction ever observed the search defaults to the
    /// leftward spin.
    #[test]
    fn test_search_default_direction() {
        let mut ctrl = LineCtrl::default();

        for _ in 0..6 {
            proc(&mut ctrl, frame(50, 50, 50));
        }

        let (cmd, report) = proc(&mut ctrl, frame(50, 50, 50));
        assert!(report.searching);
        assert_eq!(ctrl.last_valid_direction, 0);
        assert_eq!(cmd, MotorCmd { left: 0, right: 600 });
    }

    /// A single lost tick followed by a detected tick never engages the
    /// search.
    #[test]
    fn test_single_lost_tick_never_searches() {
        let mut ctrl = LineCtrl::default();

        proc(&mut ctrl, frame(2000, 1800, 100));

        let (_, report) = proc(&mut ctrl, frame(50, 50, 50));
        assert!(report.line_lost);
        assert!(!report.searching);

        let (_, report) = proc(&mut ctrl, frame(2000, 1800, 100));
        assert!(!report.line_lost);
        assert_eq!(report.lost_ticks, 0);
    }

    /// Recovery from a loss returns directly to tracking with no debounce.
    #[test]
    fn test_recovery_is_immediate() {
        let mut ctrl = LineCtrl::default();

        // Deep into a search
        for _ in 0..20 {
            proc(&mut ctrl, frame(50, 50, 50));
        }

        let (_, report) = proc(&mut ctrl, frame(1600, 1600, 1500));
        assert!(!report.line_lost);
        assert!(!report.searching);
        assert!(report.cmd_issued);
        assert_eq!(ctrl.lost_line_counter, 0);
    }

    /// Indicator classification follows the sign and magnitude of the error.
    #[test]
    fn test_lamp_classification() {
        let mut ctrl = LineCtrl::default();

        let (_, report) = proc(&mut ctrl, frame(2000, 1800, 100));
        assert_eq!(report.lamp, Some(IndicatorState::VeerRight));

        let mut ctrl = LineCtrl::default();
        let (_, report) = proc(&mut ctrl, frame(100, 1800, 2000));
        assert_eq!(report.lamp, Some(IndicatorState::VeerLeft));

        let mut ctrl = LineCtrl::default();
        let (_, report) = proc(&mut ctrl, frame(1600, 1600, 1500));
        assert_eq!(report.lamp, Some(IndicatorState::Centered));
    }
}
