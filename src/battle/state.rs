//! The battle state aggregate.
//!
//! One serializable tree holds everything a battle is: both sides, card
//! zones, the merged timeline with its execution cursor, the enemy plan,
//! the combo of the current turn, the pending-choice suspension, the log,
//! and the RNG stream position. Snapshots round-trip through serde with
//! no hidden state: deserializing and re-running a resolve step advances
//! exactly like the in-memory original.

use serde::{Deserialize, Serialize};

use crate::cards::{CardHandle, CardId, CardInstance, HandleAllocator};
use crate::combo::ComboResult;
use crate::core::{ActorRef, BattleLog, BattleRngState, Entity};
use crate::enemy::{EnemyGroup, EnemyPlan};
use crate::ether;
use crate::timeline::TimelineAction;

/// Turn phase.
///
/// `select → respond → resolve → post` cycles until a terminal phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Player chooses cards.
    Select,
    /// Optional repositioning window before execution.
    Respond,
    /// The timeline executes.
    Resolve,
    /// Turn wrap-up; rewards and continue.
    Post,
    Victory,
    Defeat,
}

/// A suspended card-creation choice.
///
/// The scheduler refuses to step while one of these is parked; the UI
/// answers it through `resume_choice`. The pause is a state, not a
/// timer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub actor: ActorRef,
    /// Candidate card ids to conjure.
    pub options: Vec<CardId>,
    /// Ghost copies to spawn once chosen.
    pub copies: u32,
    /// Timeline position the ghosts are spliced at.
    pub at_sp: i32,
}

/// Aggregate battle state. Plain nested data; see module docs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: Phase,
    pub turn_number: u32,

    pub player: Entity,
    pub enemy: EnemyGroup,

    pub hand: Vec<CardInstance>,
    pub deck: Vec<CardInstance>,
    pub discard_pile: Vec<CardInstance>,

    /// Cards chosen this turn, in submission order.
    pub selected: Vec<CardInstance>,

    /// The merged timeline for this turn.
    pub queue: Vec<TimelineAction>,
    /// Execution cursor; only increases within a resolve phase.
    pub q_index: usize,

    pub enemy_plan: Option<EnemyPlan>,

    /// Parked card-creation choice; suspends resolution while present.
    pub pending_choice: Option<ChoiceRequest>,

    /// This turn's combo classification.
    pub combo: Option<ComboResult>,
    /// Whether the combo multiplier has been consumed this resolve.
    pub combo_bonus_spent: bool,

    pub handles: HandleAllocator,
    pub log: BattleLog,
    pub rng_state: BattleRngState,
}

impl BattleState {
    /// Create a fresh battle state in `Select` of turn 1.
    #[must_use]
    pub fn new(player: Entity, enemy: EnemyGroup) -> Self {
        Self {
            phase: Phase::Select,
            turn_number: 1,
            player,
            enemy,
            hand: Vec::new(),
            deck: Vec::new(),
            discard_pile: Vec::new(),
            selected: Vec::new(),
            queue: Vec::new(),
            q_index: 0,
            enemy_plan: None,
            pending_choice: None,
            combo: None,
            combo_bonus_spent: false,
            handles: HandleAllocator::new(),
            log: BattleLog::new(),
            rng_state: BattleRngState::default(),
        }
    }

    /// Resolve an actor reference to its entity.
    #[must_use]
    pub fn entity(&self, actor: ActorRef) -> Option<&Entity> {
        match actor {
            ActorRef::Player => Some(&self.player),
            ActorRef::Enemy(i) => self.enemy.units.get(i),
        }
    }

    /// Mutable entity access.
    pub fn entity_mut(&mut self, actor: ActorRef) -> Option<&mut Entity> {
        match actor {
            ActorRef::Player => Some(&mut self.player),
            ActorRef::Enemy(i) => self.enemy.units.get_mut(i),
        }
    }

    /// Default target for an actor's action: the first living opposing
    /// combatant.
    #[must_use]
    pub fn default_target(&self, actor: ActorRef) -> Option<ActorRef> {
        match actor {
            ActorRef::Player => self.enemy.first_living().map(ActorRef::Enemy),
            ActorRef::Enemy(_) => self.player.is_alive().then_some(ActorRef::Player),
        }
    }

    /// The side-level ether pool behind an actor.
    #[must_use]
    pub fn ether_of(&self, actor: ActorRef) -> i32 {
        match actor {
            ActorRef::Player => self.player.ether_pts,
            ActorRef::Enemy(_) => self.enemy.ether_pts,
        }
    }

    /// Adjust a side's ether pool.
    pub fn add_ether(&mut self, actor: ActorRef, delta: i32) {
        match actor {
            ActorRef::Player => self.player.ether_pts += delta,
            ActorRef::Enemy(_) => self.enemy.ether_pts += delta,
        }
    }

    /// Whether a side has crossed the overdrive threshold.
    #[must_use]
    pub fn overdrive_of(&self, actor: ActorRef) -> bool {
        ether::overdrive(self.ether_of(actor))
    }

    /// The timeline budget of the side owning an actor.
    #[must_use]
    pub fn side_max_speed(&self, actor: ActorRef) -> i32 {
        match actor {
            ActorRef::Player => self.player.max_speed,
            ActorRef::Enemy(_) => self.enemy.max_speed(),
        }
    }

    /// Find a card in hand by handle.
    #[must_use]
    pub fn hand_card(&self, handle: CardHandle) -> Option<&CardInstance> {
        self.hand.iter().find(|c| c.handle == handle)
    }
}
