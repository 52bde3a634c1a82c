//! Poker-style combo detection over the submitted hand.
//!
//! Cards are classified by two independent groupings: equal `action_cost`
//! multiplicity (pair, triple, four/five of a kind, two pair, full house)
//! and `kind` homogeneity across at least four cards (flush). The
//! strongest matching classification wins and maps to a fixed damage /
//! ether multiplier.
//!
//! Ghost cards and `Outcast`-trait cards never count toward detection.
//! Matched cards are tagged in the result so downstream bonuses
//! (cooperation traits, relic combo effects) can identify membership
//! without re-running detection.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardHandle, CardInstance, CardKind, CardRegistry, TraitId};

/// Combo classification, weakest to strongest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComboKind {
    HighCard,
    Pair,
    TwoPair,
    Triple,
    Flush,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl ComboKind {
    /// Fixed multiplier table.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            ComboKind::HighCard => 1.0,
            ComboKind::Pair => 2.0,
            ComboKind::TwoPair => 2.5,
            ComboKind::Triple => 3.0,
            ComboKind::Flush => 3.5,
            ComboKind::FullHouse => 3.75,
            ComboKind::FourOfAKind => 4.0,
            ComboKind::FiveOfAKind => 5.0,
        }
    }

    /// Tie-break rank; higher beats lower.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            ComboKind::HighCard => 0,
            ComboKind::Pair => 1,
            ComboKind::TwoPair => 2,
            ComboKind::Triple => 3,
            ComboKind::Flush => 4,
            ComboKind::FullHouse => 5,
            ComboKind::FourOfAKind => 6,
            ComboKind::FiveOfAKind => 7,
        }
    }

    /// User-visible display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ComboKind::HighCard => "하이 카드",
            ComboKind::Pair => "페어",
            ComboKind::TwoPair => "투 페어",
            ComboKind::Triple => "트리플",
            ComboKind::Flush => "플러시",
            ComboKind::FullHouse => "풀 하우스",
            ComboKind::FourOfAKind => "포카드",
            ComboKind::FiveOfAKind => "파이브 카드",
        }
    }
}

impl std::fmt::Display for ComboKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Detection output: classification plus the cards that formed it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboResult {
    pub kind: ComboKind,
    pub multiplier: f64,
    pub rank: u8,
    /// Handles of the cards that formed the combo.
    pub matched: Vec<CardHandle>,
}

impl ComboResult {
    fn of(kind: ComboKind, matched: Vec<CardHandle>) -> Self {
        Self { kind, multiplier: kind.multiplier(), rank: kind.rank(), matched }
    }

    /// Whether a specific card is part of the combo.
    #[must_use]
    pub fn includes(&self, handle: CardHandle) -> bool {
        self.matched.contains(&handle)
    }
}

/// Classify the submitted card set.
///
/// Ghosts, `Outcast` cards, and cards missing from the registry are
/// excluded before grouping.
#[must_use]
pub fn detect(selected: &[CardInstance], registry: &CardRegistry) -> ComboResult {
    // (handle, action_cost, kind) for every eligible card
    let eligible: Vec<(CardHandle, i32, CardKind)> = selected
        .iter()
        .filter_map(|inst| {
            if inst.is_ghost {
                return None;
            }
            let def = registry.get(inst.card_id)?;
            if inst.has_trait(def, TraitId::Outcast) {
                return None;
            }
            Some((inst.handle, def.action_cost, def.kind))
        })
        .collect();

    let mut cost_groups: FxHashMap<i32, Vec<CardHandle>> = FxHashMap::default();
    let mut kind_groups: FxHashMap<CardKind, Vec<CardHandle>> = FxHashMap::default();
    for &(handle, cost, kind) in &eligible {
        cost_groups.entry(cost).or_default().push(handle);
        kind_groups.entry(kind).or_default().push(handle);
    }

    // Cost groups sorted by size descending, then by cost for determinism.
    let mut groups: Vec<(i32, Vec<CardHandle>)> = cost_groups.into_iter().collect();
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));

    let largest = groups.first().map_or(0, |g| g.1.len());
    let second = groups.get(1).map_or(0, |g| g.1.len());
    let flush = kind_groups
        .values()
        .find(|handles| handles.len() >= 4)
        .cloned();

    if largest >= 5 {
        return ComboResult::of(ComboKind::FiveOfAKind, groups[0].1.clone());
    }
    if largest == 4 {
        return ComboResult::of(ComboKind::FourOfAKind, groups[0].1.clone());
    }
    if largest == 3 && second >= 2 {
        let mut matched = groups[0].1.clone();
        matched.extend(groups[1].1.iter().take(2).copied());
        return ComboResult::of(ComboKind::FullHouse, matched);
    }
    if let Some(matched) = flush {
        return ComboResult::of(ComboKind::Flush, matched);
    }
    if largest == 3 {
        return ComboResult::of(ComboKind::Triple, groups[0].1.clone());
    }
    if largest == 2 && second == 2 {
        let mut matched = groups[0].1.clone();
        matched.extend(groups[1].1.iter().copied());
        return ComboResult::of(ComboKind::TwoPair, matched);
    }
    if largest == 2 {
        return ComboResult::of(ComboKind::Pair, groups[0].1.clone());
    }

    ComboResult::of(ComboKind::HighCard, Vec::new())
}
