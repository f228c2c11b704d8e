//! Core types shared across the combat engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a battle a combatant fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// The other side of the battle
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Both sides in registration order (player first)
    pub fn both() -> [Side; 2] {
        [Side::Player, Side::Enemy]
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

/// Damage type used by the damage formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Physical,
    Magic,
}

/// Final result of a battle, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleOutcome::Victory => write!(f, "victory"),
            BattleOutcome::Defeat => write!(f, "defeat"),
        }
    }
}

/// Named numeric stats that combat math reads directly
///
/// Everything else an effect can touch lives in the open-ended
/// derived counters of [`crate::stat_block::EffectiveStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    // === Core ===
    Health,
    Attack,
    Armor,
    Speed,

    // === Offense ===
    CritChance,
    CritDamage,
    PhysicalDamageAmplification,
    MagicDamageAmplification,
    AttackSpeed,

    // === Defense ===
    EvasionChance,
    EvasionDamageReduction,
    MagicDamageReduction,
    PhysicalDamageReduction,
    DeathSaveCharges,

    // === Resources ===
    ManaRegeneration,
    AbilityEffectiveness,

    // === Status capacity ===
    ExtraShieldStacks,
    ExtraPoisonStacks,
    ExtraFrostStacks,
    ExtraRegenStacks,

    // === Equipment auras ===
    EnemyMissChanceBonusPct,
    LifestealPct,
}

impl Stat {
    /// Get all stats
    pub fn all() -> &'static [Stat] {
        &[
            Stat::Health,
            Stat::Attack,
            Stat::Armor,
            Stat::Speed,
            Stat::CritChance,
            Stat::CritDamage,
            Stat::PhysicalDamageAmplification,
            Stat::MagicDamageAmplification,
            Stat::AttackSpeed,
            Stat::EvasionChance,
            Stat::EvasionDamageReduction,
            Stat::MagicDamageReduction,
            Stat::PhysicalDamageReduction,
            Stat::DeathSaveCharges,
            Stat::ManaRegeneration,
            Stat::AbilityEffectiveness,
            Stat::ExtraShieldStacks,
            Stat::ExtraPoisonStacks,
            Stat::ExtraFrostStacks,
            Stat::ExtraRegenStacks,
            Stat::EnemyMissChanceBonusPct,
            Stat::LifestealPct,
        ]
    }
}
