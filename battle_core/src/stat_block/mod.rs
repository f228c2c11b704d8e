//! Effective stats - the derived numeric block combat math reads

mod aggregator;
mod stat_value;

pub use aggregator::StatAccumulator;
pub use stat_value::StatValue;

use crate::types::Stat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Derived stats for one hero, recomputed from base stats, purchased
/// abilities and equipment before each battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStats {
    // === Core ===
    pub health: f64,
    pub attack: f64,
    /// Percentage reduction of incoming physical damage
    pub armor: f64,
    /// Attacks per second
    pub speed: f64,

    // === Offense ===
    pub crit_chance: f64,
    pub crit_damage: f64,
    pub physical_damage_amplification: f64,
    pub magic_damage_amplification: f64,
    pub attack_speed: f64,

    // === Defense ===
    pub evasion_chance: f64,
    /// Fraction of damage removed when an attack is evaded
    pub evasion_damage_reduction: f64,
    pub magic_damage_reduction: f64,
    pub physical_damage_reduction: f64,
    pub death_save_charges: f64,

    // === Resources ===
    pub mana_regeneration: f64,
    pub ability_effectiveness: f64,

    // === Status capacity ===
    pub extra_shield_stacks: f64,
    pub extra_poison_stacks: f64,
    pub extra_frost_stacks: f64,
    pub extra_regen_stacks: f64,

    // === Equipment auras ===
    pub enemy_miss_chance_bonus_pct: f64,
    pub lifesteal_pct: f64,

    /// Named counters without combat math of their own
    #[serde(default)]
    pub derived: BTreeMap<String, f64>,
    /// Boolean markers
    #[serde(default)]
    pub flags: BTreeSet<String>,
}

impl EffectiveStats {
    /// Read a stat by key
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Health => self.health,
            Stat::Attack => self.attack,
            Stat::Armor => self.armor,
            Stat::Speed => self.speed,
            Stat::CritChance => self.crit_chance,
            Stat::CritDamage => self.crit_damage,
            Stat::PhysicalDamageAmplification => self.physical_damage_amplification,
            Stat::MagicDamageAmplification => self.magic_damage_amplification,
            Stat::AttackSpeed => self.attack_speed,
            Stat::EvasionChance => self.evasion_chance,
            Stat::EvasionDamageReduction => self.evasion_damage_reduction,
            Stat::MagicDamageReduction => self.magic_damage_reduction,
            Stat::PhysicalDamageReduction => self.physical_damage_reduction,
            Stat::DeathSaveCharges => self.death_save_charges,
            Stat::ManaRegeneration => self.mana_regeneration,
            Stat::AbilityEffectiveness => self.ability_effectiveness,
            Stat::ExtraShieldStacks => self.extra_shield_stacks,
            Stat::ExtraPoisonStacks => self.extra_poison_stacks,
            Stat::ExtraFrostStacks => self.extra_frost_stacks,
            Stat::ExtraRegenStacks => self.extra_regen_stacks,
            Stat::EnemyMissChanceBonusPct => self.enemy_miss_chance_bonus_pct,
            Stat::LifestealPct => self.lifesteal_pct,
        }
    }

    /// Overwrite a stat by key
    pub fn set(&mut self, stat: Stat, value: f64) {
        let slot = match stat {
            Stat::Health => &mut self.health,
            Stat::Attack => &mut self.attack,
            Stat::Armor => &mut self.armor,
            Stat::Speed => &mut self.speed,
            Stat::CritChance => &mut self.crit_chance,
            Stat::CritDamage => &mut self.crit_damage,
            Stat::PhysicalDamageAmplification => &mut self.physical_damage_amplification,
            Stat::MagicDamageAmplification => &mut self.magic_damage_amplification,
            Stat::AttackSpeed => &mut self.attack_speed,
            Stat::EvasionChance => &mut self.evasion_chance,
            Stat::EvasionDamageReduction => &mut self.evasion_damage_reduction,
            Stat::MagicDamageReduction => &mut self.magic_damage_reduction,
            Stat::PhysicalDamageReduction => &mut self.physical_damage_reduction,
            Stat::DeathSaveCharges => &mut self.death_save_charges,
            Stat::ManaRegeneration => &mut self.mana_regeneration,
            Stat::AbilityEffectiveness => &mut self.ability_effectiveness,
            Stat::ExtraShieldStacks => &mut self.extra_shield_stacks,
            Stat::ExtraPoisonStacks => &mut self.extra_poison_stacks,
            Stat::ExtraFrostStacks => &mut self.extra_frost_stacks,
            Stat::ExtraRegenStacks => &mut self.extra_regen_stacks,
            Stat::EnemyMissChanceBonusPct => &mut self.enemy_miss_chance_bonus_pct,
            Stat::LifestealPct => &mut self.lifesteal_pct,
        };
        *slot = value;
    }

    /// Read a derived counter, 0 when absent
    pub fn derived(&self, name: &str) -> f64 {
        self.derived.get(name).copied().unwrap_or(0.0)
    }

    /// Check a boolean marker
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    /// Whole death-save charges still available
    pub fn death_saves(&self) -> u32 {
        self.death_save_charges.max(0.0).floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_round_trip_every_stat() {
        let mut stats = EffectiveStats::default();
        for (i, &stat) in Stat::all().iter().enumerate() {
            stats.set(stat, i as f64 + 0.5);
        }
        for (i, &stat) in Stat::all().iter().enumerate() {
            assert!((stats.get(stat) - (i as f64 + 0.5)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_death_saves_floor() {
        let stats = EffectiveStats {
            death_save_charges: 1.7,
            ..Default::default()
        };
        assert_eq!(stats.death_saves(), 1);
    }
}
