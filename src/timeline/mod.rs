//! The timeline: scheduled actions, the merge scheduler, and the step
//! executor.

pub mod action;
pub mod executor;
pub mod scheduler;

pub use action::TimelineAction;
pub use executor::{attack_damage, check_outcome, step, BattleOutcome, StepOutcome};
pub use scheduler::{build_queue, sort_queue, splice};
