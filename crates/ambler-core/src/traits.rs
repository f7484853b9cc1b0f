use crate::types::{Action, Observation};

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// A policy that maps observations to actions.
///
/// The inference engine is a black box to the controller: a fixed-length
/// float vector goes in, a float vector of at least
/// [`JOINT_COUNT`](crate::types::JOINT_COUNT) values comes out. The call is
/// blocking and synchronous; the caller owns the tick deadline.
pub trait Policy: Send + Sync + 'static {
    /// Given an observation, produce an action.
    fn get_action(&self, obs: &Observation) -> Action;

    /// Human-readable name for this policy.
    fn name(&self) -> &str;

    /// Whether this policy is deterministic (no randomness).
    fn is_deterministic(&self) -> bool {
        true
    }
}
