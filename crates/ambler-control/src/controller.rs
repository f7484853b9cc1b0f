//! The per-tick controller: sensor snapshot + velocity goal in, joint
//! command (and the observation that produced it) out.

use thiserror::Error;

use ambler_core::config::ControllerConfig;
use ambler_core::error::{ActionError, ConfigError, SensorError};
use ambler_core::msgs::{JointCommand, SensorSnapshot, VelocityGoal};
use ambler_core::traits::Policy;
use ambler_core::types::{NominalPose, Observation, JOINT_COUNT};

use crate::command::command_from_action;
use crate::contact::ContactTracker;
use crate::observation::build_observation;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can fail a control tick.
///
/// A failed tick leaves the rolling state as it was before the failing
/// stage; the caller decides whether to repeat the previous command or
/// safe-stop. Nothing here is retried.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ControlError {
    /// Sensor snapshot or velocity goal failed validation.
    #[error("invalid sensor input: {0}")]
    Sensor(#[from] SensorError),

    /// The policy produced an unusable action.
    #[error("policy action rejected: {0}")]
    Action(#[from] ActionError),
}

// ---------------------------------------------------------------------------
// TickOutput
// ---------------------------------------------------------------------------

/// Everything one successful tick produces.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Joint command to hand to the actuators.
    pub command: JointCommand,
    /// The observation the policy saw, for diagnostics publishing.
    pub observation: Observation,
}

// ---------------------------------------------------------------------------
// NeuralController
// ---------------------------------------------------------------------------

/// Boundary adapter around an opaque locomotion policy.
///
/// Owns the rolling state ([`ContactTracker`]) and the boxed policy. One
/// instance serves one control loop; `&mut self` on [`step`](Self::step)
/// encodes the at-most-one-in-flight-tick contract, so no locking is
/// needed.
pub struct NeuralController {
    config: ControllerConfig,
    nominal: NominalPose,
    tracker: ContactTracker,
    policy: Box<dyn Policy>,
}

impl std::fmt::Debug for NeuralController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeuralController")
            .field("config", &self.config)
            .field("tracker", &self.tracker)
            .field("policy", &self.policy.name())
            .finish()
    }
}

impl NeuralController {
    /// Create a controller from a validated configuration and a policy.
    pub fn new(config: ControllerConfig, policy: Box<dyn Policy>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            nominal: NominalPose::new(config.nominal_pose),
            tracker: ContactTracker::new(config.foot_contact_threshold),
            config,
            policy,
        })
    }

    /// Validate the inputs and assemble this tick's observation, updating
    /// the rolling contact state.
    pub fn observe(
        &mut self,
        goal: &VelocityGoal,
        snapshot: &SensorSnapshot,
    ) -> Result<Observation, ControlError> {
        goal.validate()?;
        snapshot.validate()?;
        Ok(build_observation(
            goal,
            snapshot,
            &self.nominal,
            &mut self.tracker,
            self.config.cycle_mode,
        ))
    }

    /// Run one full control tick: observe, infer, map back to a command,
    /// and record the raw action for the next tick's observation.
    pub fn step(
        &mut self,
        goal: &VelocityGoal,
        snapshot: &SensorSnapshot,
    ) -> Result<TickOutput, ControlError> {
        let observation = self.observe(goal, snapshot)?;

        let action = self.policy.get_action(&observation);
        action.validate()?;
        let command = command_from_action(&action, &self.nominal, &self.config)?;

        // Record the raw output, not the nominal-referenced target.
        let mut raw = [0.0_f32; JOINT_COUNT];
        raw.copy_from_slice(&action.as_slice()[..JOINT_COUNT]);
        self.tracker.record_last_action(&raw);

        Ok(TickOutput {
            command,
            observation,
        })
    }

    /// Store a new foot-contact threshold, unconditionally.
    pub const fn set_foot_contact_threshold(&mut self, threshold: i16) {
        self.tracker.set_threshold(threshold);
    }

    /// Current foot-contact threshold.
    #[must_use]
    pub const fn foot_contact_threshold(&self) -> i16 {
        self.tracker.threshold()
    }

    /// Read access to the rolling state.
    #[must_use]
    pub const fn tracker(&self) -> &ContactTracker {
        &self.tracker
    }

    /// The nominal pose this controller references.
    #[must_use]
    pub const fn nominal(&self) -> &NominalPose {
        &self.nominal
    }

    /// Name of the wrapped policy.
    #[must_use]
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{CONTACT_OFFSET, LAST_ACTION_OFFSET};
    use ambler_core::types::Action;
    use approx::assert_relative_eq;

    /// Policy that fails the 12-value minimum, for contract-violation tests.
    struct StubShortPolicy;

    impl Policy for StubShortPolicy {
        fn get_action(&self, _obs: &Observation) -> Action {
            Action::zeros(4)
        }

        #[allow(clippy::unnecessary_literal_bound)]
        fn name(&self) -> &str {
            "StubShortPolicy"
        }
    }

    /// Policy returning a fixed 12-value action.
    struct StubConstant(f32);

    impl Policy for StubConstant {
        fn get_action(&self, _obs: &Observation) -> Action {
            Action::from(vec![self.0; JOINT_COUNT])
        }

        #[allow(clippy::unnecessary_literal_bound)]
        fn name(&self) -> &str {
            "StubConstant"
        }
    }

    fn zero_pose_config() -> ControllerConfig {
        ControllerConfig {
            nominal_pose: [0.0; JOINT_COUNT],
            ..ControllerConfig::default()
        }
    }

    fn controller(policy: Box<dyn Policy>) -> NeuralController {
        NeuralController::new(zero_pose_config(), policy).unwrap()
    }

    // ---- Construction ----

    #[test]
    fn new_rejects_invalid_config() {
        let config = ControllerConfig {
            position_gain: f32::NAN,
            ..ControllerConfig::default()
        };
        assert!(NeuralController::new(config, Box::new(StubConstant(0.0))).is_err());
    }

    #[test]
    fn new_seeds_tracker_from_config() {
        let config = ControllerConfig {
            foot_contact_threshold: 77,
            ..zero_pose_config()
        };
        let ctrl = NeuralController::new(config, Box::new(StubConstant(0.0))).unwrap();
        assert_eq!(ctrl.foot_contact_threshold(), 77);
    }

    // ---- Threshold passthrough ----

    #[test]
    fn threshold_setter_and_getter() {
        let mut ctrl = controller(Box::new(StubConstant(0.0)));
        ctrl.set_foot_contact_threshold(-3);
        assert_eq!(ctrl.foot_contact_threshold(), -3);
    }

    // ---- observe ----

    #[test]
    fn observe_rejects_bad_goal() {
        let mut ctrl = controller(Box::new(StubConstant(0.0)));
        let goal = VelocityGoal {
            linear_x: f32::NAN,
            ..VelocityGoal::default()
        };
        let err = ctrl.observe(&goal, &SensorSnapshot::default()).unwrap_err();
        assert!(matches!(err, ControlError::Sensor(_)));
    }

    #[test]
    fn observe_rejects_bad_snapshot() {
        let mut ctrl = controller(Box::new(StubConstant(0.0)));
        let mut snapshot = SensorSnapshot::default();
        snapshot.joints.front_left.thigh.q = f32::NAN;
        let err = ctrl
            .observe(&VelocityGoal::default(), &snapshot)
            .unwrap_err();
        assert!(matches!(
            err,
            ControlError::Sensor(SensorError::NonFiniteJointState { .. })
        ));
    }

    // ---- step ----

    #[test]
    fn step_maps_constant_action_through_nominal() {
        let mut ctrl = controller(Box::new(StubConstant(0.05)));
        let out = ctrl
            .step(&VelocityGoal::default(), &SensorSnapshot::default())
            .unwrap();
        for t in out.command.targets {
            assert_relative_eq!(t, 0.05, epsilon = 1e-6);
        }
        assert_eq!(out.command.mode, 0x0A);
        assert_relative_eq!(out.command.kp, 20.0);
        assert_relative_eq!(out.command.kd, 0.5);
    }

    #[test]
    fn step_records_raw_action_for_next_tick() {
        let mut ctrl = controller(Box::new(StubConstant(0.05)));
        let goal = VelocityGoal::default();
        let snapshot = SensorSnapshot::default();

        let first = ctrl.step(&goal, &snapshot).unwrap();
        // First tick: last action block still zeroed.
        for i in 0..JOINT_COUNT {
            assert_relative_eq!(first.observation[LAST_ACTION_OFFSET + i], 0.0);
        }

        let second = ctrl.step(&goal, &snapshot).unwrap();
        // Second tick: previous raw output visible.
        for i in 0..JOINT_COUNT {
            assert_relative_eq!(
                second.observation[LAST_ACTION_OFFSET + i],
                0.05,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn step_rejects_short_policy_output() {
        let mut ctrl = controller(Box::new(StubShortPolicy));
        let err = ctrl
            .step(&VelocityGoal::default(), &SensorSnapshot::default())
            .unwrap_err();
        assert_eq!(
            err,
            ControlError::Action(ActionError::TooShort {
                expected: JOINT_COUNT,
                got: 4
            })
        );
        // The failed tick did not pollute the rolling action state.
        assert_eq!(ctrl.tracker().last_action(), &[0.0; JOINT_COUNT]);
    }

    #[test]
    fn step_classifies_contact_from_forces() {
        let mut ctrl = controller(Box::new(StubConstant(0.0)));
        ctrl.set_foot_contact_threshold(50);
        let mut snapshot = SensorSnapshot::default();
        snapshot.foot_force.front_right = 60;
        snapshot.foot_force.rear_right = 60;
        let out = ctrl.step(&VelocityGoal::default(), &snapshot).unwrap();
        let contact = &out.observation.as_slice()[CONTACT_OFFSET..CONTACT_OFFSET + 4];
        assert_eq!(contact, &[1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn debug_includes_policy_name() {
        let ctrl = controller(Box::new(StubConstant(0.0)));
        let repr = format!("{ctrl:?}");
        assert!(repr.contains("StubConstant"));
    }
}
