//! Wire-shaped records exchanged with the message transport.
//!
//! These mirror the robot platform's low-level sensor and command messages.
//! They carry no behavior beyond flattening into the fixed leg/joint order
//! and input validation; transport and serialization framing live elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::SensorError;
use crate::types::{JointId, LegId, JOINT_COUNT, LEG_COUNT};

/// Reserved PMSM servo operating-mode code, applied to every joint command.
pub const PMSM_SERVO_MODE: u8 = 0x0A;

/// Orientation quaternion norms below this are rejected as degenerate.
const MIN_ORIENTATION_NORM: f32 = 1e-6;

// ---------------------------------------------------------------------------
// Joint state
// ---------------------------------------------------------------------------

/// One servo's measured angle (rad) and angular velocity (rad/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServoState {
    pub q: f32,
    pub dq: f32,
}

/// The three servos of one leg, proximal to distal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegServos {
    pub hip: ServoState,
    pub thigh: ServoState,
    pub calf: ServoState,
}

impl LegServos {
    /// Servo state for one joint of this leg.
    #[must_use]
    pub const fn servo(&self, joint: JointId) -> &ServoState {
        match joint {
            JointId::Hip => &self.hip,
            JointId::Thigh => &self.thigh,
            JointId::Calf => &self.calf,
        }
    }
}

/// Joint states for all four legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointStates {
    pub front_right: LegServos,
    pub front_left: LegServos,
    pub rear_right: LegServos,
    pub rear_left: LegServos,
}

impl JointStates {
    /// Servos of one leg.
    #[must_use]
    pub const fn leg(&self, leg: LegId) -> &LegServos {
        match leg {
            LegId::FrontRight => &self.front_right,
            LegId::FrontLeft => &self.front_left,
            LegId::RearRight => &self.rear_right,
            LegId::RearLeft => &self.rear_left,
        }
    }

    /// All joint angles flattened into the fixed leg/joint order.
    #[must_use]
    pub fn angles(&self) -> [f32; JOINT_COUNT] {
        let mut out = [0.0; JOINT_COUNT];
        let mut i = 0;
        for leg in LegId::ALL {
            for joint in JointId::ALL {
                out[i] = self.leg(leg).servo(joint).q;
                i += 1;
            }
        }
        out
    }

    /// All joint angular velocities flattened into the fixed leg/joint order.
    #[must_use]
    pub fn velocities(&self) -> [f32; JOINT_COUNT] {
        let mut out = [0.0; JOINT_COUNT];
        let mut i = 0;
        for leg in LegId::ALL {
            for joint in JointId::ALL {
                out[i] = self.leg(leg).servo(joint).dq;
                i += 1;
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// IMU orientation quaternion (Hamilton), scalar-last wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Orientation {
    /// Identity rotation.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }

    /// Euclidean norm of the quaternion.
    #[must_use]
    pub fn norm(&self) -> f32 {
        (self.w.mul_add(self.w, self.z.mul_add(self.z, self.x.mul_add(self.x, self.y * self.y))))
            .sqrt()
    }

    /// Reject non-finite or near-zero quaternions before they reach the
    /// gravity transform, where they would turn into NaNs.
    pub fn validate(&self) -> Result<(), SensorError> {
        if !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite())
        {
            return Err(SensorError::NonFiniteOrientation);
        }
        let norm = self.norm();
        if norm < MIN_ORIENTATION_NORM {
            return Err(SensorError::DegenerateOrientation { norm });
        }
        Ok(())
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

// ---------------------------------------------------------------------------
// Foot forces
// ---------------------------------------------------------------------------

/// Raw per-leg foot-force readings.
///
/// The field-to-slot mapping is one-to-one with [`LegId`]; in particular the
/// rear-right reading lands in the rear-right slot and never its neighbor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootForces {
    pub front_right: i16,
    pub front_left: i16,
    pub rear_right: i16,
    pub rear_left: i16,
}

impl FootForces {
    /// Force reading for one leg.
    #[must_use]
    pub const fn force(&self, leg: LegId) -> i16 {
        match leg {
            LegId::FrontRight => self.front_right,
            LegId::FrontLeft => self.front_left,
            LegId::RearRight => self.rear_right,
            LegId::RearLeft => self.rear_left,
        }
    }

    /// Readings in leg slot order.
    #[must_use]
    pub const fn as_array(&self) -> [i16; LEG_COUNT] {
        [
            self.front_right,
            self.front_left,
            self.rear_right,
            self.rear_left,
        ]
    }
}

// ---------------------------------------------------------------------------
// SensorSnapshot
// ---------------------------------------------------------------------------

/// One control tick's worth of sensor data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub joints: JointStates,
    pub orientation: Orientation,
    pub foot_force: FootForces,
    /// Monotonic sensor tick clock, microseconds.
    pub tick_us: u32,
}

impl SensorSnapshot {
    /// Sensor tick clock in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tick_ms(&self) -> f32 {
        self.tick_us as f32 / 1000.0
    }

    /// Check every joint reading and the orientation for usability.
    pub fn validate(&self) -> Result<(), SensorError> {
        for leg in LegId::ALL {
            for joint in JointId::ALL {
                let servo = self.joints.leg(leg).servo(joint);
                if !(servo.q.is_finite() && servo.dq.is_finite()) {
                    return Err(SensorError::NonFiniteJointState { leg, joint });
                }
            }
        }
        self.orientation.validate()
    }
}

// ---------------------------------------------------------------------------
// VelocityGoal
// ---------------------------------------------------------------------------

/// Commanded body velocity: planar linear components plus yaw rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityGoal {
    /// Forward velocity (m/s).
    pub linear_x: f32,
    /// Lateral velocity (m/s).
    pub linear_y: f32,
    /// Yaw rate (rad/s).
    pub angular_z: f32,
}

impl VelocityGoal {
    pub fn validate(&self) -> Result<(), SensorError> {
        if self.linear_x.is_finite() && self.linear_y.is_finite() && self.angular_z.is_finite() {
            Ok(())
        } else {
            Err(SensorError::NonFiniteGoal)
        }
    }
}

// ---------------------------------------------------------------------------
// JointCommand
// ---------------------------------------------------------------------------

/// Per-tick actuator command: 12 absolute joint targets plus the servo
/// parameters shared by all joints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointCommand {
    /// Absolute joint-angle targets (rad), fixed leg/joint order.
    pub targets: [f32; JOINT_COUNT],
    /// Servo operating mode.
    pub mode: u8,
    /// Position gain, identical across joints.
    pub kp: f32,
    /// Velocity-damping gain, identical across joints.
    pub kd: f32,
}

impl JointCommand {
    /// Target angle for one joint.
    #[must_use]
    pub const fn target(&self, leg: LegId, joint: JointId) -> f32 {
        self.targets[crate::types::joint_index(leg, joint)]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
