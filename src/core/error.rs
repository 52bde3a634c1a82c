//! Error taxonomy for the battle engine.
//!
//! Three severities, per the engine's tolerance rules:
//!
//! - `ValidationError`: a hand submission exceeded a budget. Returned to
//!   the caller with the user-visible reason; the phase does not change.
//! - Data-integrity problems (unknown card / special / token id) are not
//!   errors at all: the offending unit of work is skipped with a log line,
//!   because one bad catalog entry must never halt an in-progress battle.
//! - Invariant violations (negative stacks, out-of-range cursor) are
//!   clamped in place rather than surfaced; a crashed battle is worse than
//!   a slightly wrong number.

use serde::{Deserialize, Serialize};

/// Rejection reason for an invalid hand submission.
///
/// `Display` renders the user-visible reason string shown by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// Aggregate speed cost exceeds the player's max speed.
    SpeedExceeded { limit: i32, submitted: i32 },
    /// Aggregate action cost exceeds the player's max energy.
    EnergyExceeded { limit: i32, submitted: i32 },
    /// More cards submitted than the per-turn cap allows.
    TooManyCards { limit: usize, submitted: usize },
    /// Nothing was selected.
    EmptySelection,
    /// The operation is not legal in the current phase.
    WrongPhase,
    /// A submitted handle does not refer to a card in hand.
    UnknownCard,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::SpeedExceeded { limit, submitted } => {
                write!(f, "속도 초과 ({submitted}/{limit})")
            }
            ValidationError::EnergyExceeded { limit, submitted } => {
                write!(f, "행동력 초과 ({submitted}/{limit})")
            }
            ValidationError::TooManyCards { limit, submitted } => {
                write!(f, "제출 한도 초과 ({submitted}/{limit})")
            }
            ValidationError::EmptySelection => write!(f, "선택된 카드가 없습니다"),
            ValidationError::WrongPhase => write!(f, "지금은 제출할 수 없습니다"),
            ValidationError::UnknownCard => write!(f, "손패에 없는 카드입니다"),
        }
    }
}

impl std::error::Error for ValidationError {}
