//! Deck and discard operations.
//!
//! Draws come from the top of the deck (the end of the vec). An empty
//! deck with a non-empty discard reshuffles exactly once per draw call:
//! sub-specialty cards go on top, the rest are shuffled beneath them.
//! `Escape`-trait cards named in the ban set are diverted to the discard
//! instead of being drawn.
//!
//! Conservation holds across every call: the returned deck, drawn cards,
//! and discard are a permutation of the inputs.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardInstance, CardKind, CardRegistry, HandleAllocator, TraitId};
use crate::core::rng::BattleRng;

/// Result of a draw: the new zones plus what was drawn.
#[derive(Clone, Debug)]
pub struct DrawResult {
    pub drawn: Vec<CardInstance>,
    pub deck: Vec<CardInstance>,
    pub discard: Vec<CardInstance>,
    pub reshuffled: bool,
}

/// Draw `count` cards, reshuffling the discard at most once.
#[must_use]
pub fn draw_from_deck(
    mut deck: Vec<CardInstance>,
    mut discard: Vec<CardInstance>,
    count: usize,
    escape_ban: &[CardId],
    registry: &CardRegistry,
    rng: &mut BattleRng,
) -> DrawResult {
    let mut drawn = Vec::with_capacity(count);
    let mut reshuffled = false;

    while drawn.len() < count {
        if deck.is_empty() {
            if reshuffled || discard.is_empty() {
                break;
            }
            reshuffle(&mut deck, &mut discard, registry, rng);
            reshuffled = true;
        }

        let Some(card) = deck.pop() else {
            break;
        };

        let banned = escape_ban.contains(&card.card_id)
            && registry
                .get(card.card_id)
                .map_or(false, |def| card.has_trait(def, TraitId::Escape));
        if banned {
            discard.push(card);
            continue;
        }

        drawn.push(card);
    }

    DrawResult { drawn, deck, discard, reshuffled }
}

/// Move the discard into the deck: sub-specialty cards on top, the rest
/// shuffled beneath them.
fn reshuffle(
    deck: &mut Vec<CardInstance>,
    discard: &mut Vec<CardInstance>,
    registry: &CardRegistry,
    rng: &mut BattleRng,
) {
    let (specials, mut rest): (Vec<_>, Vec<_>) = discard.drain(..).partition(|card| {
        registry
            .get(card.card_id)
            .map_or(false, |def| def.kind == CardKind::Special)
    });

    rng.shuffle(&mut rest);
    deck.extend(rest);
    // Top of the deck is the end of the vec.
    deck.extend(specials);
}

/// A character build: the deck list plus the opening sub-specialty hand.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CharacterBuild {
    pub cards: Vec<CardId>,
    pub main_specials: Vec<CardId>,
}

/// Growth progression: extra traits granted to specific cards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GrowthState {
    pub granted: Vec<(CardId, TraitId)>,
}

/// Result of deck initialization.
#[derive(Clone, Debug)]
pub struct InitializedDeck {
    pub deck: Vec<CardInstance>,
    pub main_specials: Vec<CardInstance>,
}

/// Build the battle deck from a character build.
///
/// Vanished card ids are removed, growth traits are applied to their
/// cards, and the deck is shuffled. Sub-specialty cards become the
/// opening hand instead of entering the deck.
#[must_use]
pub fn initialize_deck(
    build: &CharacterBuild,
    vanished: &[CardId],
    growth: &GrowthState,
    rng: &mut BattleRng,
    handles: &mut HandleAllocator,
) -> InitializedDeck {
    let instantiate = |id: CardId, handles: &mut HandleAllocator| {
        let mut instance = CardInstance::new(handles.alloc(), id);
        for &(card_id, granted) in &growth.granted {
            if card_id == id {
                instance = instance.with_granted_trait(granted);
            }
        }
        instance
    };

    let mut deck: Vec<CardInstance> = build
        .cards
        .iter()
        .filter(|id| !vanished.contains(id))
        .map(|&id| instantiate(id, handles))
        .collect();
    rng.shuffle(&mut deck);

    let main_specials = build
        .main_specials
        .iter()
        .filter(|id| !vanished.contains(id))
        .map(|&id| instantiate(id, handles))
        .collect();

    InitializedDeck { deck, main_specials }
}
