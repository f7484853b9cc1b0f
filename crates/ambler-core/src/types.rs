use serde::{Deserialize, Serialize};

use crate::error::ActionError;

// ---------------------------------------------------------------------------
// Leg and joint indexing
// ---------------------------------------------------------------------------

/// Number of legs on the platform.
pub const LEG_COUNT: usize = 4;

/// Actuated joints per leg.
pub const JOINTS_PER_LEG: usize = 3;

/// Total actuated joints.
pub const JOINT_COUNT: usize = LEG_COUNT * JOINTS_PER_LEG;

/// Total observation width: relative joint positions, orientation (x, y, z),
/// joint velocities, velocity goal, foot contact flags, body-frame gravity,
/// previous action, cycles since contact — concatenated in that order.
pub const OBSERVATION_DIM: usize =
    JOINT_COUNT + 3 + JOINT_COUNT + 3 + LEG_COUNT + 3 + JOINT_COUNT + LEG_COUNT;

/// Leg slot indices.
///
/// This ordering is the contract the policy was trained against: every
/// 4-length and 12-length array in this workspace visits legs in exactly this
/// order. Moving a leg to a different slot silently degrades the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum LegId {
    FrontRight = 0,
    FrontLeft = 1,
    RearRight = 2,
    RearLeft = 3,
}

impl LegId {
    /// All legs, in slot order.
    pub const ALL: [Self; LEG_COUNT] = [
        Self::FrontRight,
        Self::FrontLeft,
        Self::RearRight,
        Self::RearLeft,
    ];

    /// Slot index of this leg.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Joint indices within a leg, proximal to distal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum JointId {
    Hip = 0,
    Thigh = 1,
    Calf = 2,
}

impl JointId {
    /// All joints of one leg, proximal to distal.
    pub const ALL: [Self; JOINTS_PER_LEG] = [Self::Hip, Self::Thigh, Self::Calf];

    /// Index of this joint within its leg.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Flat index of a joint in a 12-length array.
#[must_use]
pub const fn joint_index(leg: LegId, joint: JointId) -> usize {
    leg.index() * JOINTS_PER_LEG + joint.index()
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// Flat f32 vector handed to the policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    data: Vec<f32>,
}

impl Observation {
    #[must_use]
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl std::ops::Index<usize> for Observation {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl From<Vec<f32>> for Observation {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Raw continuous policy output.
///
/// The controller interprets the first [`JOINT_COUNT`] values as per-joint
/// offsets from the nominal pose; a trained network may emit extra trailing
/// values, which are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    data: Vec<f32>,
}

impl Action {
    #[must_use]
    pub const fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Validate action data (no NaN, no Inf).
    pub fn validate(&self) -> Result<(), ActionError> {
        for val in &self.data {
            if val.is_nan() {
                return Err(ActionError::ContainsNan);
            }
            if val.is_infinite() {
                return Err(ActionError::ContainsInf);
            }
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Action {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        &self.data[i]
    }
}

impl From<Vec<f32>> for Action {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

// ---------------------------------------------------------------------------
// NominalPose
// ---------------------------------------------------------------------------

/// Reference joint configuration, fixed at construction.
///
/// Joint position features are expressed relative to this pose, and policy
/// outputs are mapped back through it into absolute targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalPose([f32; JOINT_COUNT]);

impl NominalPose {
    #[must_use]
    pub const fn new(offsets: [f32; JOINT_COUNT]) -> Self {
        Self(offsets)
    }

    /// Nominal angle of one joint.
    #[must_use]
    pub const fn offset(&self, leg: LegId, joint: JointId) -> f32 {
        self.0[joint_index(leg, joint)]
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f32; JOINT_COUNT] {
        &self.0
    }
}

impl From<[f32; JOINT_COUNT]> for NominalPose {
    fn from(offsets: [f32; JOINT_COUNT]) -> Self {
        Self(offsets)
    }
}

impl Default for NominalPose {
    fn default() -> Self {
        Self([0.0; JOINT_COUNT])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
