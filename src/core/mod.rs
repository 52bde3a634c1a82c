//! Core primitives: combatants, deterministic RNG, battle log, errors.

pub mod entity;
pub mod error;
pub mod log;
pub mod rng;

pub use entity::{ActorRef, Entity};
pub use error::ValidationError;
pub use log::BattleLog;
pub use rng::{BattleRng, BattleRngState};
