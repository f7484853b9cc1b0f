//! Feature-vector assembly: one sensor snapshot plus one velocity goal in,
//! one fixed-layout observation out.
//!
//! The block order and widths below are the contract the policy was trained
//! against. Reordering or padding them differently silently degrades or
//! destabilizes the controller, so the layout is spelled out as offset
//! constants and asserted in tests.

use ambler_core::config::CycleMode;
use ambler_core::msgs::{Orientation, SensorSnapshot, VelocityGoal};
use ambler_core::types::{NominalPose, Observation, JOINT_COUNT, LEG_COUNT, OBSERVATION_DIM};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::contact::ContactTracker;

// ---------------------------------------------------------------------------
// Observation layout
// ---------------------------------------------------------------------------

/// Joint positions relative to the nominal pose.
pub const REL_POSITION_OFFSET: usize = 0;
/// Orientation quaternion x, y, z (w is used only for the gravity block).
pub const ORIENTATION_OFFSET: usize = REL_POSITION_OFFSET + JOINT_COUNT;
/// Joint angular velocities.
pub const JOINT_VELOCITY_OFFSET: usize = ORIENTATION_OFFSET + 3;
/// Goal linear x, linear y, angular z.
pub const GOAL_OFFSET: usize = JOINT_VELOCITY_OFFSET + JOINT_COUNT;
/// Foot contact flags.
pub const CONTACT_OFFSET: usize = GOAL_OFFSET + 3;
/// Gravity direction in the body frame.
pub const GRAVITY_OFFSET: usize = CONTACT_OFFSET + LEG_COUNT;
/// Previous tick's raw policy output.
pub const LAST_ACTION_OFFSET: usize = GRAVITY_OFFSET + 3;
/// Cycles (or milliseconds) since last contact.
pub const CYCLES_OFFSET: usize = LAST_ACTION_OFFSET + JOINT_COUNT;

// ---------------------------------------------------------------------------
// Gravity transform
// ---------------------------------------------------------------------------

/// Gravity direction in the body (sensor) frame.
///
/// Rotates the world-frame gravity direction (0, 0, -1) by the IMU
/// orientation quaternion (Hamilton convention; the orientation rotates
/// world vectors into the sensor frame), then renormalizes. The identity
/// orientation yields exactly (0, 0, -1).
#[must_use]
pub fn gravity_in_body_frame(orientation: &Orientation) -> [f32; 3] {
    let quat = UnitQuaternion::from_quaternion(Quaternion::new(
        orientation.w,
        orientation.x,
        orientation.y,
        orientation.z,
    ));
    let gravity = quat
        .transform_vector(&Vector3::new(0.0, 0.0, -1.0))
        .normalize();
    [gravity.x, gravity.y, gravity.z]
}

// ---------------------------------------------------------------------------
// build_observation
// ---------------------------------------------------------------------------

/// Assemble the policy observation for one tick, updating the tracker's
/// contact flags and contact-duration counters along the way.
///
/// Inputs are assumed validated; non-finite sensor values propagate
/// numerically (the controller rejects them before calling this).
pub fn build_observation(
    goal: &VelocityGoal,
    snapshot: &SensorSnapshot,
    nominal: &NominalPose,
    tracker: &mut ContactTracker,
    mode: CycleMode,
) -> Observation {
    let mut data = Vec::with_capacity(OBSERVATION_DIM);

    // Joint positions relative to the nominal pose.
    for (angle, offset) in snapshot.joints.angles().iter().zip(nominal.as_array()) {
        data.push(angle - offset);
    }

    // Orientation quaternion, vector part only.
    data.push(snapshot.orientation.x);
    data.push(snapshot.orientation.y);
    data.push(snapshot.orientation.z);

    // Joint angular velocities, legs in slot order.
    data.extend_from_slice(&snapshot.joints.velocities());

    // Velocity goal.
    data.push(goal.linear_x);
    data.push(goal.linear_y);
    data.push(goal.angular_z);

    // Foot contact flags, reclassified from this snapshot's forces.
    tracker.update_from_forces(&snapshot.foot_force);
    data.extend_from_slice(tracker.contact());

    // Gravity direction in the body frame.
    data.extend_from_slice(&gravity_in_body_frame(&snapshot.orientation));

    // Previous tick's raw policy output.
    data.extend_from_slice(tracker.last_action());

    // Time since touchdown, per leg, via exactly one update strategy.
    match mode {
        CycleMode::Ticks => tracker.advance_cycles(),
        CycleMode::Timestamp => tracker.advance_cycles_at(snapshot.tick_ms()),
    }
    data.extend_from_slice(tracker.cycles_since_contact());

    debug_assert_eq!(data.len(), OBSERVATION_DIM);
    Observation::new(data)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
