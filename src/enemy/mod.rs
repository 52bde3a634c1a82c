//! Enemy side: unit group, behavioral configuration, and the per-turn
//! action planner.

pub mod planner;

use serde::{Deserialize, Serialize};

use crate::core::Entity;

pub use planner::{plan_turn, EnemyMode, EnemyPlan, ModeWeights, PlannedAction};

use crate::cards::CardId;

/// Behavioral configuration for an enemy encounter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Relative weights for the per-turn mode pick.
    pub mode_weights: ModeWeights,

    /// Per-turn cap on planned actions.
    pub cards_per_turn: u32,

    /// Card ids the planner draws from.
    pub deck: Vec<CardId>,

    /// Ether gained at each turn start.
    pub ether_regen: i32,
}

/// The enemy side: 1..N units acting as one group.
///
/// Ether is a side-level resource — the group shares one pool, which is
/// what the planner converts to slots and what the depletion loss
/// condition watches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyGroup {
    pub units: Vec<Entity>,
    pub config: EnemyConfig,
    pub ether_pts: i32,
}

impl EnemyGroup {
    /// Create a group from units and configuration.
    #[must_use]
    pub fn new(units: Vec<Entity>, config: EnemyConfig) -> Self {
        Self { units, config, ether_pts: 0 }
    }

    /// Set starting ether (builder style).
    #[must_use]
    pub fn with_ether(mut self, pts: i32) -> Self {
        self.ether_pts = pts;
        self
    }

    #[must_use]
    pub fn any_alive(&self) -> bool {
        self.units.iter().any(Entity::is_alive)
    }

    /// Index of the first living unit, the default target.
    #[must_use]
    pub fn first_living(&self) -> Option<usize> {
        self.units.iter().position(Entity::is_alive)
    }

    /// The group's timeline budget (from the lead unit).
    #[must_use]
    pub fn max_speed(&self) -> i32 {
        self.units.first().map_or(0, |u| u.max_speed)
    }
}
