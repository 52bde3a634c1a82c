//! Special-effect definitions.
//!
//! Card catalogs carry a string dispatch key (`"push:2"`,
//! `"conjure:151|152:2"`, …). The key parses into the closed
//! `SpecialEffect` enum so the resolver's dispatch is exhaustive at
//! compile time, while unknown keys in data degrade to a logged no-op
//! instead of crashing a battle.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// A card's special behavior, dispatched once per action execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialEffect {
    /// Delay the opposing side's next unexecuted action.
    Push { amount: i32 },

    /// Hasten the actor's own next unexecuted action.
    Advance { amount: i32 },

    /// Shove the opposing side's next unexecuted action to the end of
    /// its timeline.
    Freeze,

    /// Spawn ghost actions at the current position. More than one
    /// option suspends resolution until the player chooses.
    Conjure { choices: Vec<CardId>, copies: u32 },

    /// Finish the target outright when at or under an HP percentage.
    ExecuteBelow { pct: u32 },

    /// Damage doubles when this is the only attack card submitted.
    DoubleIfSoloAttack,

    /// One extra hit per attack card left unused in hand.
    RepeatPerUnusedAttack,

    /// Damage bypasses block entirely.
    IgnoreBlock,

    /// The actor takes the target's remaining block.
    StealBlock,

    /// Clear all block on the target's side.
    ClearBlock,

    /// The actor gains counterattack damage for the turn.
    GainCounter { amount: i32 },

    /// Raise the target's incoming-damage percentage for the turn.
    Rend { pct: i32 },
}

impl SpecialEffect {
    /// Parse a catalog dispatch key. `None` for unknown/malformed keys —
    /// the caller logs and skips.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let mut parts = key.split(':');
        let head = parts.next()?;

        match head {
            "push" => {
                let amount: i32 = parts.next()?.parse().ok()?;
                Some(SpecialEffect::Push { amount })
            }
            "advance" => {
                let amount: i32 = parts.next()?.parse().ok()?;
                Some(SpecialEffect::Advance { amount })
            }
            "freeze" => Some(SpecialEffect::Freeze),
            "conjure" => {
                let choices = parts
                    .next()?
                    .split('|')
                    .map(|s| s.parse::<u32>().ok().map(CardId::new))
                    .collect::<Option<Vec<_>>>()?;
                if choices.is_empty() {
                    return None;
                }
                let copies = match parts.next() {
                    Some(c) => c.parse().ok()?,
                    None => 1,
                };
                Some(SpecialEffect::Conjure { choices, copies })
            }
            "execute" => {
                let pct: u32 = parts.next()?.parse().ok()?;
                Some(SpecialEffect::ExecuteBelow { pct })
            }
            "duel" => Some(SpecialEffect::DoubleIfSoloAttack),
            "relay" => Some(SpecialEffect::RepeatPerUnusedAttack),
            "pierce" => Some(SpecialEffect::IgnoreBlock),
            "plunder" => Some(SpecialEffect::StealBlock),
            "shatter" => Some(SpecialEffect::ClearBlock),
            "counter" => {
                let amount: i32 = parts.next()?.parse().ok()?;
                Some(SpecialEffect::GainCounter { amount })
            }
            "rend" => {
                let pct: i32 = parts.next()?.parse().ok()?;
                Some(SpecialEffect::Rend { pct })
            }
            _ => None,
        }
    }
}
