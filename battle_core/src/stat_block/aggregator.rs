//! StatAccumulator - Collects stat modifications before they become EffectiveStats

use crate::stat_block::{EffectiveStats, StatValue};
use crate::types::Stat;
use std::collections::{BTreeMap, BTreeSet};

/// Accumulates stat modifications from various sources
///
/// Sources only ever add flat values, push multiplicative scales, bump
/// named counters or raise flags. None of these read what is already
/// accumulated, which keeps folding order irrelevant.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    values: BTreeMap<Stat, StatValue>,
    /// Open-ended derived counters (e.g. `poisonAura`, `blockChance`)
    pub derived: BTreeMap<String, f64>,
    /// Boolean markers (e.g. `vendetta`, `poisonCanCrit`)
    pub flags: BTreeSet<String>,
}

impl StatAccumulator {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        StatAccumulator::default()
    }

    fn entry(&mut self, stat: Stat) -> &mut StatValue {
        self.values.entry(stat).or_default()
    }

    /// Set the base value of a stat
    pub fn set_base(&mut self, stat: Stat, value: f64) {
        self.entry(stat).base = value;
    }

    /// Add a flat amount to a stat
    pub fn add_flat(&mut self, stat: Stat, value: f64) {
        self.entry(stat).add_flat(value);
    }

    /// Scale a stat by `1 + value`
    pub fn add_scale(&mut self, stat: Stat, value: f64) {
        self.entry(stat).add_scale(value);
    }

    /// Add to a named derived counter, creating it at 0
    pub fn add_derived(&mut self, name: &str, value: f64) {
        *self.derived.entry(name.to_string()).or_insert(0.0) += value;
    }

    /// Raise a named flag
    pub fn set_flag(&mut self, name: &str) {
        self.flags.insert(name.to_string());
    }

    /// Current computed value of a stat
    pub fn value(&self, stat: Stat) -> f64 {
        self.values.get(&stat).map(StatValue::compute).unwrap_or(0.0)
    }

    /// Access the raw container for a stat
    pub fn stat_value(&self, stat: Stat) -> Option<&StatValue> {
        self.values.get(&stat)
    }

    /// Collapse everything into a stats block (before diminishing returns)
    pub fn finish(&self) -> EffectiveStats {
        let mut stats = EffectiveStats::default();
        for &stat in Stat::all() {
            stats.set(stat, self.value(stat));
        }
        stats.derived = self.derived.clone();
        stats.flags = self.flags.clone();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_stat_is_zero() {
        let acc = StatAccumulator::new();
        assert!((acc.value(Stat::LifestealPct) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flat_then_scale() {
        let mut acc = StatAccumulator::new();
        acc.set_base(Stat::Health, 500.0);
        acc.add_scale(Stat::Health, 0.10);
        acc.add_flat(Stat::Health, 100.0);
        assert!((acc.value(Stat::Health) - 660.0).abs() < 1e-9);
    }

    #[test]
    fn test_derived_counters_accumulate() {
        let mut acc = StatAccumulator::new();
        acc.add_derived("poisonAura", 3.0);
        acc.add_derived("poisonAura", 2.0);
        acc.set_flag("vendetta");

        let stats = acc.finish();
        assert!((stats.derived("poisonAura") - 5.0).abs() < f64::EPSILON);
        assert!(stats.has_flag("vendetta"));
        assert!(!stats.has_flag("poisonCanCrit"));
    }
}
