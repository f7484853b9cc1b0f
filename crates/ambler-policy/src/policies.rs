//! Deterministic stub policies.
//!
//! All policies implement [`Policy`] from `ambler-core`. They stand in for a
//! trained network during bring-up and testing.

use std::sync::Mutex;

use ambler_core::traits::Policy;
use ambler_core::types::{Action, Observation};

// ---------------------------------------------------------------------------
// ZeroPolicy
// ---------------------------------------------------------------------------

/// Policy that always returns a zero-valued action.
///
/// Mapped through the controller this commands the nominal pose exactly, so
/// it doubles as a "stand still" policy.
pub struct ZeroPolicy {
    dim: usize,
}

impl ZeroPolicy {
    #[must_use]
    pub const fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Policy for ZeroPolicy {
    fn get_action(&self, _obs: &Observation) -> Action {
        Action::zeros(self.dim)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ZeroPolicy"
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// ConstantPolicy
// ---------------------------------------------------------------------------

/// Policy that always returns the same fixed action.
pub struct ConstantPolicy {
    action: Action,
}

impl ConstantPolicy {
    #[must_use]
    pub const fn new(action: Action) -> Self {
        Self { action }
    }
}

impl Policy for ConstantPolicy {
    fn get_action(&self, _obs: &Observation) -> Action {
        self.action.clone()
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ConstantPolicy"
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// ScriptedPolicy
// ---------------------------------------------------------------------------

/// Policy that replays a fixed sequence of actions, cycling when exhausted.
///
/// Thread-safe via [`Mutex`] around the replay index.
pub struct ScriptedPolicy {
    actions: Vec<Action>,
    index: Mutex<usize>,
}

impl ScriptedPolicy {
    /// Create a scripted policy from a sequence of actions.
    ///
    /// # Panics
    ///
    /// Panics if `actions` is empty.
    #[must_use]
    pub fn new(actions: Vec<Action>) -> Self {
        assert!(
            !actions.is_empty(),
            "ScriptedPolicy requires at least one action"
        );
        Self {
            actions,
            index: Mutex::new(0),
        }
    }
}

impl Policy for ScriptedPolicy {
    fn get_action(&self, _obs: &Observation) -> Action {
        let mut idx = self.index.lock().unwrap();
        let action = self.actions[*idx].clone();
        *idx = (*idx + 1) % self.actions.len();
        action
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ScriptedPolicy"
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_obs() -> Observation {
        Observation::new(vec![1.0, 2.0, 3.0])
    }

    // -- ZeroPolicy --

    #[test]
    fn zero_policy_returns_zeros() {
        let policy = ZeroPolicy::new(12);
        let action = policy.get_action(&dummy_obs());
        assert_eq!(action.len(), 12);
        for &v in action.as_slice() {
            assert!(v.abs() < f32::EPSILON);
        }
    }

    #[test]
    fn zero_policy_name() {
        assert_eq!(ZeroPolicy::new(1).name(), "ZeroPolicy");
    }

    // -- ConstantPolicy --

    #[test]
    fn constant_policy_returns_fixed_action() {
        let action = Action::from(vec![1.0, 2.0, 3.0]);
        let policy = ConstantPolicy::new(action.clone());
        assert_eq!(policy.get_action(&dummy_obs()).as_slice(), action.as_slice());
    }

    #[test]
    fn constant_policy_name() {
        assert_eq!(ConstantPolicy::new(Action::zeros(1)).name(), "ConstantPolicy");
    }

    // -- ScriptedPolicy --

    #[test]
    fn scripted_policy_replays_sequence() {
        let policy = ScriptedPolicy::new(vec![
            Action::from(vec![1.0]),
            Action::from(vec![2.0]),
            Action::from(vec![3.0]),
        ]);

        assert_eq!(policy.get_action(&dummy_obs()).as_slice(), &[1.0]);
        assert_eq!(policy.get_action(&dummy_obs()).as_slice(), &[2.0]);
        assert_eq!(policy.get_action(&dummy_obs()).as_slice(), &[3.0]);
        // Cycles back
        assert_eq!(policy.get_action(&dummy_obs()).as_slice(), &[1.0]);
    }

    #[test]
    #[should_panic(expected = "at least one action")]
    fn scripted_policy_panics_on_empty() {
        ScriptedPolicy::new(vec![]);
    }

    // -- Send + Sync --

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn policy_types_are_send_sync() {
        assert_send_sync::<ZeroPolicy>();
        assert_send_sync::<ConstantPolicy>();
        assert_send_sync::<ScriptedPolicy>();
    }
}
