//! BaseStatsSource - Stats from a hero's base block

use crate::hero::BaseStats;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::Stat;

/// Seeds the accumulator with a hero's immutable base stats
pub struct BaseStatsSource<'a> {
    pub stats: &'a BaseStats,
}

impl<'a> BaseStatsSource<'a> {
    /// Create a new base stats source
    pub fn new(stats: &'a BaseStats) -> Self {
        BaseStatsSource { stats }
    }
}

impl StatSource for BaseStatsSource<'_> {
    fn id(&self) -> &str {
        "base_stats"
    }

    fn priority(&self) -> i32 {
        -100 // Base stats apply first
    }

    fn apply(&self, acc: &mut StatAccumulator) {
        let s = self.stats;
        acc.set_base(Stat::Health, s.health);
        acc.set_base(Stat::Attack, s.attack);
        acc.set_base(Stat::Armor, s.armor);
        acc.set_base(Stat::Speed, s.speed);
        acc.set_base(Stat::CritChance, s.crit_chance);
        acc.set_base(Stat::CritDamage, s.crit_damage);
        acc.set_base(Stat::EvasionChance, s.evasion_chance);
        acc.set_base(Stat::EvasionDamageReduction, s.evasion_damage_reduction);
        acc.set_base(Stat::MagicDamageReduction, s.magic_damage_reduction);
        acc.set_base(Stat::PhysicalDamageReduction, s.physical_damage_reduction);
        acc.set_base(Stat::PhysicalDamageAmplification, s.physical_damage_amplification);
        acc.set_base(Stat::MagicDamageAmplification, s.magic_damage_amplification);
        acc.set_base(Stat::ManaRegeneration, s.mana_regeneration);
    }
}
