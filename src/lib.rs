//! # etherline
//!
//! A deterministic battle resolution engine for a timeline deck-builder:
//! the player submits a hand of cards each turn, cards and enemy actions
//! merge into one speed-ordered timeline, and the queue executes step by
//! step producing damage, block, status tokens, and ether.
//!
//! ## Design Principles
//!
//! 1. **Explicit state**: every operation is a synchronous function over
//!    a `BattleState` passed in by the caller. No framework lifecycle,
//!    no hidden current-battle reference, no timers.
//!
//! 2. **Injectable randomness**: all randomness flows through a seeded,
//!    forkable, serializable `BattleRng`. Same seed, same battle.
//!
//! 3. **Partial-failure tolerance**: unknown card / special / token data
//!    logs and skips. A bad catalog entry must never crash an
//!    in-progress battle.
//!
//! 4. **Suspension as state**: the respond window and conjure choices
//!    park the engine in a waiting state that the caller resumes; there
//!    is no internal timer machinery.
//!
//! ## Modules
//!
//! - `core`: combatants, deterministic RNG, battle log, errors
//! - `cards`: card definitions, instances, registry, starter catalog
//! - `tokens`: three-scope status-token engine
//! - `combo`: poker-style hand classification and multipliers
//! - `ether`: point-to-slot resource math and the overdrive threshold
//! - `effects`: per-card special effects and their resolver
//! - `timeline`: action queue, merge scheduler, step executor
//! - `enemy`: enemy group, mode selection, action planning
//! - `battle`: deck operations, passive deltas, the phase engine

pub mod battle;
pub mod cards;
pub mod combo;
pub mod core;
pub mod effects;
pub mod enemy;
pub mod ether;
pub mod timeline;
pub mod tokens;

// Re-export commonly used types
pub use crate::core::{ActorRef, BattleLog, BattleRng, BattleRngState, Entity, ValidationError};

pub use crate::cards::{
    CardDefinition, CardHandle, CardId, CardInstance, CardKind, CardRegistry, HandleAllocator,
    TraitId,
};

pub use crate::tokens::{
    GrantCtx, TokenApplication, TokenGrant, TokenId, TokenScope, TokenStore, TokenView, REMOVE_ALL,
};

pub use crate::combo::{ComboKind, ComboResult};

pub use crate::effects::{DamagePlan, SpecialEffect, SpecialOutcome};

pub use crate::timeline::{BattleOutcome, StepOutcome, TimelineAction};

pub use crate::enemy::{EnemyConfig, EnemyGroup, EnemyMode, EnemyPlan, ModeWeights, PlannedAction};

pub use crate::battle::{
    BattleConfig, BattleEngine, BattleSetup, BattleState, CharacterBuild, ChoiceRequest,
    GrowthState, PassiveDeltas, Phase,
};
