//! Effect registry - maps purchased-ability keys to stat transforms
//!
//! Every catalog effect key resolves to one [`StatTransform`] tagged with a
//! thematic [`EffectCategory`]. Transforms only ever add to the accumulator,
//! so a hero's abilities can be folded in any order.

mod catalog;

use crate::hero::AbilityDescriptor;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::Stat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Thematic grouping of effect keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCategory {
    Combat,
    Defense,
    Resource,
    Status,
    Tactical,
    Conditional,
}

/// The one thing an effect does to the stat block, scaled by the ability's value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatTransform {
    /// `stat += value`
    Flat(Stat),
    /// `stat += value / 100`
    Percent(Stat),
    /// `stat *= 1 + value / 100` for each listed stat
    Scale(&'static [Stat]),
    /// attack, speed and armor `+= value`; health `+= value * 10`
    StatBoost,
    /// Derived counter `+= value`
    Counter(&'static str),
    /// Derived counter `+= value / 100`
    Rate(&'static str),
    /// Raise a boolean marker
    Flag(&'static str),
}

impl StatTransform {
    /// Apply this transform with the given magnitude
    pub fn apply(&self, value: f64, acc: &mut StatAccumulator) {
        match *self {
            StatTransform::Flat(stat) => acc.add_flat(stat, value),
            StatTransform::Percent(stat) => acc.add_flat(stat, value / 100.0),
            StatTransform::Scale(stats) => {
                for &stat in stats {
                    acc.add_scale(stat, value / 100.0);
                }
            }
            StatTransform::StatBoost => {
                acc.add_flat(Stat::Attack, value);
                acc.add_flat(Stat::Speed, value);
                acc.add_flat(Stat::Armor, value);
                acc.add_flat(Stat::Health, value * 10.0);
            }
            StatTransform::Counter(name) => acc.add_derived(name, value),
            StatTransform::Rate(name) => acc.add_derived(name, value / 100.0),
            StatTransform::Flag(name) => acc.set_flag(name),
        }
    }
}

/// Registered entry for one effect key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectDefinition {
    pub category: EffectCategory,
    pub transform: StatTransform,
}

/// A purchased ability bound to its transform
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityEffect {
    pub key: String,
    pub category: EffectCategory,
    pub transform: StatTransform,
    pub value: f64,
}

impl StatSource for AbilityEffect {
    fn id(&self) -> &str {
        &self.key
    }

    fn apply(&self, acc: &mut StatAccumulator) {
        self.transform.apply(self.value, acc);
    }
}

/// Registry of effect keys
#[derive(Debug, Clone, Default)]
pub struct EffectRegistry {
    effects: HashMap<String, EffectDefinition>,
}

impl EffectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in effect key
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for &(key, category, transform) in catalog::DEFAULT_EFFECTS {
            registry.register(key, category, transform);
        }
        registry
    }

    /// Register (or replace) an effect key
    pub fn register(&mut self, key: impl Into<String>, category: EffectCategory, transform: StatTransform) {
        self.effects.insert(key.into(), EffectDefinition { category, transform });
    }

    /// Look up an effect key
    pub fn get(&self, key: &str) -> Option<&EffectDefinition> {
        self.effects.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.effects.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Keys registered under a category
    pub fn keys_in(&self, category: EffectCategory) -> impl Iterator<Item = &str> {
        self.effects
            .iter()
            .filter(move |(_, def)| def.category == category)
            .map(|(key, _)| key.as_str())
    }

    /// Bind a purchased ability to its transform; `None` for unknown keys
    pub fn create_effect(&self, ability: &AbilityDescriptor) -> Option<AbilityEffect> {
        let def = self.get(&ability.effect)?;
        Some(AbilityEffect {
            key: ability.effect.clone(),
            category: def.category,
            transform: def.transform,
            value: ability.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(registry: &EffectRegistry, abilities: &[AbilityDescriptor]) -> StatAccumulator {
        let mut acc = StatAccumulator::new();
        acc.set_base(Stat::Health, 1000.0);
        acc.set_base(Stat::Attack, 50.0);
        acc.set_base(Stat::Speed, 1.0);
        acc.set_base(Stat::Armor, 10.0);
        for ability in abilities {
            if let Some(effect) = registry.create_effect(ability) {
                effect.apply(&mut acc);
            }
        }
        acc
    }

    #[test]
    fn test_unknown_key_is_none() {
        let registry = EffectRegistry::with_defaults();
        let ability = AbilityDescriptor::new("Sparkles", "cosmetic_sparkles", 5.0);
        assert!(registry.create_effect(&ability).is_none());
    }

    #[test]
    fn test_flat_and_percent() {
        let registry = EffectRegistry::with_defaults();
        let acc = apply_all(
            &registry,
            &[
                AbilityDescriptor::new("Might", "attack_boost", 15.0),
                AbilityDescriptor::new("Precision", "crit_chance", 10.0),
            ],
        );
        assert!((acc.value(Stat::Attack) - 65.0).abs() < f64::EPSILON);
        assert!((acc.value(Stat::CritChance) - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_stat_boost() {
        let registry = EffectRegistry::with_defaults();
        let acc = apply_all(&registry, &[AbilityDescriptor::new("All Round", "stat_boost", 2.0)]);
        assert!((acc.value(Stat::Attack) - 52.0).abs() < f64::EPSILON);
        assert!((acc.value(Stat::Health) - 1020.0).abs() < f64::EPSILON);
        assert!((acc.value(Stat::Speed) - 3.0).abs() < f64::EPSILON);
        assert!((acc.value(Stat::Armor) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_counters_rates_and_flags() {
        let registry = EffectRegistry::with_defaults();
        let acc = apply_all(
            &registry,
            &[
                AbilityDescriptor::new("Toxic Aura", "poison_aura", 3.0),
                AbilityDescriptor::new("Bulwark", "block_chance", 25.0),
                AbilityDescriptor::new("Vendetta", "vendetta", 1.0),
            ],
        );
        let stats = acc.finish();
        assert!((stats.derived("poisonAura") - 3.0).abs() < f64::EPSILON);
        assert!((stats.derived("blockChance") - 0.25).abs() < 1e-9);
        assert!(stats.has_flag("vendetta"));
    }

    #[test]
    fn test_ultimate_power_commutes_with_flat() {
        let registry = EffectRegistry::with_defaults();
        let boost = AbilityDescriptor::new("Might", "attack_boost", 50.0);
        let power = AbilityDescriptor::new("Power", "ultimate_power", 20.0);

        let forward = apply_all(&registry, &[boost.clone(), power.clone()]);
        let backward = apply_all(&registry, &[power, boost]);

        assert!((forward.value(Stat::Attack) - 120.0).abs() < 1e-9);
        assert!((forward.value(Stat::Attack) - backward.value(Stat::Attack)).abs() < 1e-9);
    }

    #[test]
    fn test_categories_cover_every_family() {
        let registry = EffectRegistry::with_defaults();
        for category in [
            EffectCategory::Combat,
            EffectCategory::Defense,
            EffectCategory::Resource,
            EffectCategory::Status,
            EffectCategory::Tactical,
            EffectCategory::Conditional,
        ] {
            assert!(registry.keys_in(category).next().is_some(), "empty category {:?}", category);
        }
    }

    #[test]
    fn test_register_overrides() {
        let mut registry = EffectRegistry::new();
        registry.register("glass_cannon", EffectCategory::Combat, StatTransform::Flat(Stat::Attack));
        assert_eq!(registry.len(), 1);
        let effect = registry
            .create_effect(&AbilityDescriptor::new("Glass", "glass_cannon", 30.0))
            .unwrap();
        assert_eq!(effect.category, EffectCategory::Combat);
        assert_eq!(effect.id(), "glass_cannon");
    }
}
