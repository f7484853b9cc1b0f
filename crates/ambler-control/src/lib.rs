//! Boundary adapter between raw quadruped sensor data and a learned
//! locomotion policy.
//!
//! Each control tick, [`NeuralController`](controller::NeuralController)
//! turns one sensor snapshot plus one velocity goal into the fixed-layout
//! feature vector the policy was trained against, hands it to a boxed
//! [`Policy`](ambler_core::traits::Policy), and maps the raw output back
//! into absolute joint targets with fixed servo gains. The rolling state in
//! between (previous action, contact flags, time since contact) lives in
//! [`ContactTracker`](contact::ContactTracker).

pub mod command;
pub mod contact;
pub mod controller;
pub mod observation;

pub mod prelude {
    pub use crate::command::command_from_action;
    pub use crate::contact::ContactTracker;
    pub use crate::controller::{ControlError, NeuralController, TickOutput};
    pub use crate::observation::{build_observation, gravity_in_body_frame};
}
