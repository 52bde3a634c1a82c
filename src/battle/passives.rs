//! Passive-effect deltas from the relic/ego collaborator.
//!
//! The engine never computes these — they arrive as opaque additive
//! deltas and are consumed at phase boundaries (combat start, turn
//! start). Passing them explicitly keeps the engine a pure function of
//! its inputs; no handler reaches into ambient build/growth state.

use serde::{Deserialize, Serialize};

/// Additive modifiers applied at a phase boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveDeltas {
    /// HP restored at the boundary.
    pub heal: i32,
    /// Block granted at the boundary.
    pub block: i32,
    /// Added to the derived max energy.
    pub energy_bonus: i32,
    /// Added to the derived max speed.
    pub speed_bonus: i32,
    /// Added to strength (consumed once, at combat start).
    pub strength_bonus: i32,
    /// Ether granted at the boundary.
    pub ether_gain: i32,
}

impl PassiveDeltas {
    /// No passive effects at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }
}
