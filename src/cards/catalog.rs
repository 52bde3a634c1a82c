//! Built-in starter catalog.
//!
//! Pure data: the card set used by the scenario tests and the demo
//! encounters. Real games register their own content on top of (or
//! instead of) this set — the engine only ever sees the registry.

use crate::tokens::{TokenGrant, TokenId, TokenScope};

use super::definition::{CardDefinition, CardId, CardKind, TraitId};
use super::registry::CardRegistry;

/// Catalog ids, grouped by band: 1xx attacks, 15x conjured ghosts,
/// 2xx defenses, 3xx supports, 4xx sub-specialties, 5xx enemy cards.
pub mod ids {
    use crate::cards::definition::CardId;

    pub const SLASH: CardId = CardId::new(101);
    pub const HEAVY_BLOW: CardId = CardId::new(102);
    pub const RAPID_THRUST: CardId = CardId::new(103);
    pub const PIERCE: CardId = CardId::new(104);
    pub const EXECUTE: CardId = CardId::new(105);
    pub const DUEL: CardId = CardId::new(106);
    pub const RELAY: CardId = CardId::new(107);
    pub const PLUNDER: CardId = CardId::new(108);
    pub const SHATTER: CardId = CardId::new(109);
    pub const BREACH: CardId = CardId::new(110);
    pub const FLECHE: CardId = CardId::new(111);
    pub const SHOVE: CardId = CardId::new(112);
    pub const COORDINATED: CardId = CardId::new(113);
    pub const OPENER: CardId = CardId::new(114);
    pub const OUTCAST_BLADE: CardId = CardId::new(115);

    pub const PHANTOM_SLASH: CardId = CardId::new(151);
    pub const PHANTOM_THRUST: CardId = CardId::new(152);

    pub const GUARD: CardId = CardId::new(201);
    pub const IRON_WALL: CardId = CardId::new(202);
    pub const VIGILANT_STANCE: CardId = CardId::new(203);
    pub const GROWING_GUARD: CardId = CardId::new(204);
    pub const THORN_MAIL: CardId = CardId::new(205);
    pub const COUNTER_STANCE: CardId = CardId::new(206);

    pub const FOCUS: CardId = CardId::new(301);
    pub const QUICKEN: CardId = CardId::new(302);
    pub const FREEZE: CardId = CardId::new(303);
    pub const BARRIER: CardId = CardId::new(304);
    pub const HEX: CardId = CardId::new(305);
    pub const EXPOSE: CardId = CardId::new(306);
    pub const ESCAPE: CardId = CardId::new(307);
    pub const REND: CardId = CardId::new(308);

    pub const ARCANE_STRIKE: CardId = CardId::new(401);
    pub const ARCANE_BULWARK: CardId = CardId::new(402);

    pub const ENEMY_STRIKE: CardId = CardId::new(501);
    pub const ENEMY_GUARD: CardId = CardId::new(502);
    pub const ENEMY_GNASH: CardId = CardId::new(503);
    pub const ENEMY_ROAR: CardId = CardId::new(504);
}

/// The built-in card set.
pub fn starter_cards() -> Vec<CardDefinition> {
    use CardKind::{Attack, Defense, Special, Support};

    vec![
        // Attacks
        CardDefinition::new(ids::SLASH, "베기", Attack)
            .with_costs(1, 2)
            .with_damage(6),
        CardDefinition::new(ids::HEAVY_BLOW, "강타", Attack)
            .with_costs(2, 3)
            .with_damage(12),
        CardDefinition::new(ids::RAPID_THRUST, "연속 찌르기", Attack)
            .with_costs(1, 2)
            .with_damage(3)
            .with_hits(3),
        CardDefinition::new(ids::PIERCE, "관통", Attack)
            .with_costs(1, 2)
            .with_damage(7)
            .with_special("pierce"),
        CardDefinition::new(ids::EXECUTE, "처형", Attack)
            .with_costs(2, 3)
            .with_damage(8)
            .with_special("execute:30"),
        CardDefinition::new(ids::DUEL, "결투", Attack)
            .with_costs(2, 2)
            .with_damage(9)
            .with_special("duel"),
        CardDefinition::new(ids::RELAY, "연계", Attack)
            .with_costs(1, 2)
            .with_damage(5)
            .with_special("relay"),
        CardDefinition::new(ids::PLUNDER, "강탈", Attack)
            .with_costs(1, 2)
            .with_damage(4)
            .with_special("plunder"),
        CardDefinition::new(ids::SHATTER, "분쇄", Attack)
            .with_costs(2, 3)
            .with_damage(6)
            .with_special("shatter"),
        CardDefinition::new(ids::BREACH, "돌파", Attack)
            .with_costs(2, 3)
            .with_damage(5)
            .with_special("conjure:151|152:2"),
        CardDefinition::new(ids::FLECHE, "플레슈", Attack)
            .with_costs(1, 1)
            .with_damage(4)
            .with_special("conjure:151:1"),
        CardDefinition::new(ids::SHOVE, "밀쳐내기", Attack)
            .with_costs(1, 2)
            .with_damage(3)
            .with_special("push:2"),
        CardDefinition::new(ids::COORDINATED, "협공", Attack)
            .with_costs(1, 2)
            .with_damage(5)
            .with_trait(TraitId::Cooperation),
        CardDefinition::new(ids::OPENER, "기선 제압", Attack)
            .with_costs(1, 1)
            .with_damage(4)
            .with_trait(TraitId::Opener),
        CardDefinition::new(ids::OUTCAST_BLADE, "외톨이 칼날", Attack)
            .with_costs(1, 2)
            .with_damage(8)
            .with_trait(TraitId::Outcast),
        // Conjured ghosts
        CardDefinition::new(ids::PHANTOM_SLASH, "환영 베기", Attack)
            .with_costs(0, 0)
            .with_damage(4),
        CardDefinition::new(ids::PHANTOM_THRUST, "환영 찌르기", Attack)
            .with_costs(0, 0)
            .with_damage(2)
            .with_hits(2),
        // Defenses
        CardDefinition::new(ids::GUARD, "방어", Defense)
            .with_costs(1, 1)
            .with_block(5),
        CardDefinition::new(ids::IRON_WALL, "철벽", Defense)
            .with_costs(2, 2)
            .with_block(12),
        CardDefinition::new(ids::VIGILANT_STANCE, "경계 태세", Defense)
            .with_costs(1, 1)
            .with_block(4)
            .with_token(TokenGrant::on_self(TokenId::Vigilance, 1, TokenScope::Turn)),
        CardDefinition::new(ids::GROWING_GUARD, "성장 방어", Defense)
            .with_costs(1, 1)
            .with_block(2)
            .with_token(TokenGrant::on_self(TokenId::GrowingDefense, 1, TokenScope::Turn)),
        CardDefinition::new(ids::THORN_MAIL, "가시 갑옷", Defense)
            .with_costs(1, 2)
            .with_block(3)
            .with_token(TokenGrant::on_self(TokenId::Thorns, 2, TokenScope::Turn)),
        CardDefinition::new(ids::COUNTER_STANCE, "반격 자세", Defense)
            .with_costs(1, 1)
            .with_block(2)
            .with_special("counter:4"),
        // Supports
        CardDefinition::new(ids::FOCUS, "집중", Support)
            .with_costs(1, 1)
            .with_token(TokenGrant::on_self(TokenId::Focus, 2, TokenScope::Turn)),
        CardDefinition::new(ids::QUICKEN, "가속", Support)
            .with_costs(1, 1)
            .with_special("advance:2"),
        CardDefinition::new(ids::FREEZE, "빙결", Support)
            .with_costs(2, 2)
            .with_special("freeze"),
        CardDefinition::new(ids::BARRIER, "결계", Support)
            .with_costs(1, 1)
            .with_token(TokenGrant::on_self(TokenId::Barrier, 1, TokenScope::Usage)),
        CardDefinition::new(ids::HEX, "저주", Support)
            .with_costs(1, 2)
            .with_token(TokenGrant::on_target(TokenId::Weak, 2, TokenScope::Turn)),
        CardDefinition::new(ids::EXPOSE, "약점 노출", Support)
            .with_costs(1, 1)
            .with_token(TokenGrant::on_target(TokenId::Vulnerable, 2, TokenScope::Turn)),
        CardDefinition::new(ids::ESCAPE, "도주", Support)
            .with_costs(0, 1)
            .with_trait(TraitId::Escape),
        CardDefinition::new(ids::REND, "찢어발기기", Support)
            .with_costs(1, 2)
            .with_special("rend:150"),
        // Sub-specialties
        CardDefinition::new(ids::ARCANE_STRIKE, "비전 일격", Special)
            .with_costs(1, 2)
            .with_damage(10),
        CardDefinition::new(ids::ARCANE_BULWARK, "비전 방벽", Special)
            .with_costs(1, 1)
            .with_block(8),
        // Enemy cards
        CardDefinition::new(ids::ENEMY_STRIKE, "맹습", Attack)
            .with_costs(1, 3)
            .with_damage(8),
        CardDefinition::new(ids::ENEMY_GUARD, "웅크리기", Defense)
            .with_costs(1, 2)
            .with_block(6),
        CardDefinition::new(ids::ENEMY_GNASH, "물어뜯기", Attack)
            .with_costs(1, 2)
            .with_damage(4)
            .with_hits(2),
        CardDefinition::new(ids::ENEMY_ROAR, "포효", Support)
            .with_costs(1, 2)
            .with_token(TokenGrant::on_target(TokenId::Weak, 1, TokenScope::Turn)),
    ]
}

/// A registry pre-loaded with the starter catalog.
#[must_use]
pub fn starter_registry() -> CardRegistry {
    let mut registry = CardRegistry::new();
    for card in starter_cards() {
        registry.register(card);
    }
    registry
}
