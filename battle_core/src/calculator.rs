//! Stats calculator - folds base stats, purchases and equipment into effective stats

use crate::config::{CombatConstants, DiminishingReturnsConstants};
use crate::effects::EffectRegistry;
use crate::hero::Hero;
use crate::source::{BaseStatsSource, EquipmentSource, StatSource};
use crate::stat_block::{EffectiveStats, StatAccumulator};

/// Pure stat pipeline for heroes
#[derive(Debug, Clone)]
pub struct StatsCalculator {
    registry: EffectRegistry,
    curves: DiminishingReturnsConstants,
}

impl Default for StatsCalculator {
    fn default() -> Self {
        Self::new(EffectRegistry::with_defaults(), &CombatConstants::default())
    }
}

impl StatsCalculator {
    pub fn new(registry: EffectRegistry, constants: &CombatConstants) -> Self {
        StatsCalculator {
            registry,
            curves: constants.diminishing_returns.clone(),
        }
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Every stat source of a hero, sorted by priority
    fn sources<'a>(&self, hero: &'a Hero) -> Vec<Box<dyn StatSource + 'a>> {
        let mut sources: Vec<Box<dyn StatSource + 'a>> = Vec::new();
        sources.push(Box::new(BaseStatsSource::new(&hero.stats)));
        // unknown effect keys contribute nothing
        sources.extend(
            hero.purchased_abilities
                .iter()
                .filter_map(|ability| self.registry.create_effect(ability))
                .map(|effect| Box::new(effect) as Box<dyn StatSource + 'a>),
        );
        sources.extend(
            hero.equipment
                .iter()
                .map(|item| Box::new(EquipmentSource::new(item)) as Box<dyn StatSource + 'a>),
        );
        sources.sort_by_key(|s| s.priority());
        sources
    }

    /// Derive effective stats without touching the hero
    ///
    /// After folding, attack, armor and speed pass through their
    /// diminishing-returns curves; active attack-speed effects then scale
    /// speed, which is then held at the configured minimum. Death-save
    /// charges already spent this battle stay spent.
    pub fn compute_stats(&self, hero: &Hero) -> EffectiveStats {
        let mut acc = StatAccumulator::new();
        for source in self.sources(hero) {
            source.apply(&mut acc);
        }
        let mut stats = acc.finish();

        stats.attack = self.curves.attack.apply(stats.attack);
        stats.armor = self.curves.armor.apply(stats.armor);
        stats.speed = self.curves.speed.apply(stats.speed);

        for bonus in hero.status_effects.attack_speed_bonuses() {
            stats.speed *= 1.0 + bonus;
        }
        stats.speed = stats.speed.max(self.curves.min_speed);

        let used = hero.battle_flags.death_saves_used as f64;
        stats.death_save_charges = (stats.death_save_charges - used).max(0.0);
        stats
    }

    /// Return a copy of `hero` carrying freshly computed effective stats
    pub fn process_hero_stats(&self, hero: &Hero) -> Hero {
        let mut processed = hero.clone();
        processed.effective_stats = self.compute_stats(hero);
        processed
    }
}
