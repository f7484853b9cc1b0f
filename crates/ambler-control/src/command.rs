//! Mapping from raw policy output back into an absolute joint command.

use ambler_core::config::ControllerConfig;
use ambler_core::error::ActionError;
use ambler_core::msgs::{JointCommand, PMSM_SERVO_MODE};
use ambler_core::types::{Action, NominalPose, JOINT_COUNT};

// ---------------------------------------------------------------------------
// command_from_action
// ---------------------------------------------------------------------------

/// Build a joint command from a raw policy action.
///
/// Uses only the first [`JOINT_COUNT`] values: each joint target is
/// `nominal + action_scale * raw`, in the fixed leg/joint order. The servo
/// mode and both gains are constants shared by all joints.
///
/// An action shorter than [`JOINT_COUNT`] signals a mismatched policy
/// artifact — a fatal integration error, not a recoverable one.
///
/// Pure function: identical inputs always produce identical commands, and
/// no rolling state is touched here (the controller records the raw action
/// separately).
pub fn command_from_action(
    action: &Action,
    nominal: &NominalPose,
    config: &ControllerConfig,
) -> Result<JointCommand, ActionError> {
    let raw = action.as_slice();
    if raw.len() < JOINT_COUNT {
        return Err(ActionError::TooShort {
            expected: JOINT_COUNT,
            got: raw.len(),
        });
    }

    let mut targets = [0.0_f32; JOINT_COUNT];
    for (i, target) in targets.iter_mut().enumerate() {
        *target = config.action_scale.mul_add(raw[i], nominal.as_array()[i]);
    }

    Ok(JointCommand {
        targets,
        mode: PMSM_SERVO_MODE,
        kp: config.position_gain,
        kd: config.damping_gain,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
