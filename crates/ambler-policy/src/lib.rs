//! Policy implementations for the ambler locomotion controller.
//!
//! Provides deterministic stub policies (zero, constant, scripted) so the
//! controller can be exercised without a trained network, and an ONNX-backed
//! policy behind the `onnx` feature flag.
//!
//! # Example
//!
//! ```
//! use ambler_core::traits::Policy;
//! use ambler_core::types::{Observation, JOINT_COUNT, OBSERVATION_DIM};
//! use ambler_policy::prelude::*;
//!
//! let policy = ZeroPolicy::new(JOINT_COUNT);
//! let action = policy.get_action(&Observation::zeros(OBSERVATION_DIM));
//! assert_eq!(action.len(), JOINT_COUNT);
//! ```

#[cfg(feature = "onnx")]
pub mod onnx;
pub mod policies;

pub mod prelude {
    #[cfg(feature = "onnx")]
    pub use crate::onnx::{OnnxPolicy, OnnxPolicyError};
    pub use crate::policies::{ConstantPolicy, ScriptedPolicy, ZeroPolicy};
}
