//! Rolling per-tick controller state: foot contact, time since contact, and
//! the previous policy action.

use ambler_core::msgs::FootForces;
use ambler_core::types::{LegId, JOINT_COUNT, LEG_COUNT};

// ---------------------------------------------------------------------------
// ContactTracker
// ---------------------------------------------------------------------------

/// Holds and updates the controller's rolling state.
///
/// Exclusively owned by the controller and mutated once per tick; it is
/// never reset except by reconstructing the controller. Contact flags are
/// stored as 0.0/1.0 floats because they are spliced verbatim into the
/// observation vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactTracker {
    threshold: i16,
    contact: [f32; LEG_COUNT],
    cycles_since_contact: [f32; LEG_COUNT],
    last_contact_ms: [f32; LEG_COUNT],
    last_action: [f32; JOINT_COUNT],
}

impl ContactTracker {
    /// Create a tracker with zeroed state and the given force threshold.
    #[must_use]
    pub const fn new(threshold: i16) -> Self {
        Self {
            threshold,
            contact: [0.0; LEG_COUNT],
            cycles_since_contact: [0.0; LEG_COUNT],
            last_contact_ms: [0.0; LEG_COUNT],
            last_action: [0.0; JOINT_COUNT],
        }
    }

    /// Store a new force threshold, unconditionally.
    ///
    /// Negative thresholds are legal and mean every reading classifies as
    /// contact.
    pub const fn set_threshold(&mut self, threshold: i16) {
        self.threshold = threshold;
    }

    /// Current force threshold.
    #[must_use]
    pub const fn threshold(&self) -> i16 {
        self.threshold
    }

    /// Reclassify contact for every leg from raw force readings.
    ///
    /// A reading strictly below the threshold means "no contact"; a reading
    /// equal to the threshold counts as contact. Overwrites previous flags.
    pub fn update_from_forces(&mut self, forces: &FootForces) {
        for leg in LegId::ALL {
            self.contact[leg.index()] = if forces.force(leg) < self.threshold {
                0.0
            } else {
                1.0
            };
        }
    }

    /// Tick-count update: a leg in contact resets its counter to zero, any
    /// other leg counts one more tick.
    ///
    /// Alternative to [`advance_cycles_at`](Self::advance_cycles_at); only
    /// one of the two runs in a given tick.
    #[allow(clippy::float_cmp)]
    pub fn advance_cycles(&mut self) {
        for i in 0..LEG_COUNT {
            if self.contact[i] == 1.0 {
                self.cycles_since_contact[i] = 0.0;
            } else {
                self.cycles_since_contact[i] += 1.0;
            }
        }
    }

    /// Timestamp update: a leg in contact records `now_ms` as its touchdown
    /// time, any other leg holds the elapsed milliseconds since its last
    /// touchdown.
    ///
    /// Known limitation: if the tick clock wraps or moves backwards the
    /// elapsed time goes negative. The value is emitted as-is (the policy
    /// receives unusual but bounded input) and logged as a data-quality
    /// warning rather than aborting the tick.
    #[allow(clippy::float_cmp)]
    pub fn advance_cycles_at(&mut self, now_ms: f32) {
        for i in 0..LEG_COUNT {
            if self.contact[i] == 1.0 {
                self.last_contact_ms[i] = now_ms;
                self.cycles_since_contact[i] = 0.0;
            } else {
                let elapsed = now_ms - self.last_contact_ms[i];
                if elapsed < 0.0 {
                    tracing::warn!(
                        leg = i,
                        elapsed_ms = elapsed,
                        "tick clock moved backwards; emitting negative contact duration"
                    );
                }
                self.cycles_since_contact[i] = elapsed;
            }
        }
    }

    /// Overwrite the stored previous action with this tick's raw output.
    pub fn record_last_action(&mut self, action: &[f32; JOINT_COUNT]) {
        self.last_action = *action;
    }

    /// Contact flags (0.0/1.0) in leg slot order.
    #[must_use]
    pub const fn contact(&self) -> &[f32; LEG_COUNT] {
        &self.contact
    }

    /// Whether one leg is currently classified as in contact.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn in_contact(&self, leg: LegId) -> bool {
        self.contact[leg.index()] == 1.0
    }

    /// Ticks (or milliseconds, in timestamp mode) since last contact, per leg.
    #[must_use]
    pub const fn cycles_since_contact(&self) -> &[f32; LEG_COUNT] {
        &self.cycles_since_contact
    }

    /// The previous tick's raw policy output.
    #[must_use]
    pub const fn last_action(&self) -> &[f32; JOINT_COUNT] {
        &self.last_action
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
