//! EquipmentSource - Stats from equipped items

use crate::hero::EquipmentItem;
use crate::source::StatSource;
use crate::stat_block::StatAccumulator;
use crate::types::Stat;

/// How a numeric equipment modifier combines with the stat block
#[derive(Debug, Clone, Copy, PartialEq)]
enum Combine {
    /// `stat += v`
    Flat(Stat),
    /// `stat += v / 100`
    Rate(Stat),
    /// `stat *= 1 + v / 100`
    Scale(Stat),
    /// Named derived counter, `+= v`
    Counter(&'static str),
}

/// Fixed combination rule per equipment key; anything else is ignored
fn combine_rule(key: &str) -> Option<Combine> {
    let rule = match key {
        "maxHpFlat" => Combine::Flat(Stat::Health),
        "attackFlat" => Combine::Flat(Stat::Attack),
        "manaRegenPerSec" => Combine::Flat(Stat::ManaRegeneration),
        "attackSpeedPct" => Combine::Scale(Stat::Speed),
        "critDamagePct" => Combine::Scale(Stat::CritDamage),
        "critChancePct" => Combine::Rate(Stat::CritChance),
        "evasionChancePct" => Combine::Rate(Stat::EvasionChance),
        "magicDamageReductionPct" => Combine::Rate(Stat::MagicDamageReduction),
        "physicalDamageReductionPct" => Combine::Flat(Stat::PhysicalDamageReduction),
        "magicDamageAmplificationPct" => Combine::Flat(Stat::MagicDamageAmplification),
        "abilityEffectivenessPct" => Combine::Flat(Stat::AbilityEffectiveness),
        "extraShieldStacks" => Combine::Flat(Stat::ExtraShieldStacks),
        "extraPoisonStacks" => Combine::Flat(Stat::ExtraPoisonStacks),
        "extraFrostStacks" => Combine::Flat(Stat::ExtraFrostStacks),
        "extraRegenStacks" => Combine::Flat(Stat::ExtraRegenStacks),
        "enemyMissChanceBonusPct" => Combine::Flat(Stat::EnemyMissChanceBonusPct),
        "lifestealPct" => Combine::Flat(Stat::LifestealPct),
        "enemyHealRegenReductionPct" => Combine::Counter("enemyRegenReductionPct"),
        "critDamageTakenReductionPct" => Combine::Counter("critDamageTakenReduction"),
        "attackDamagePct" => Combine::Counter("attackDamagePct"),
        "healthRegenPct" => Combine::Counter("healthRegenPct"),
        "stunResistancePct" => Combine::Counter("stunResistancePct"),
        "poisonDamageMultiplierPct" => Combine::Counter("poisonDamageMultiplierPct"),
        "poisonPerStackBonus" => Combine::Counter("poisonPerStackBonus"),
        _ => return None,
    };
    Some(rule)
}

/// Boolean equipment modifiers that become flags
const FLAG_KEYS: &[&str] = &["poisonCanCrit"];

/// Stats from one equipped item
pub struct EquipmentSource<'a> {
    pub item: &'a EquipmentItem,
}

impl<'a> EquipmentSource<'a> {
    /// Create a new equipment source
    pub fn new(item: &'a EquipmentItem) -> Self {
        EquipmentSource { item }
    }
}

impl StatSource for EquipmentSource<'_> {
    fn id(&self) -> &str {
        &self.item.item_type
    }

    fn priority(&self) -> i32 {
        100
    }

    fn apply(&self, acc: &mut StatAccumulator) {
        for (key, value) in self.item.numeric_effects() {
            match combine_rule(key) {
                Some(Combine::Flat(stat)) => acc.add_flat(stat, value),
                Some(Combine::Rate(stat)) => acc.add_flat(stat, value / 100.0),
                Some(Combine::Scale(stat)) => acc.add_scale(stat, value / 100.0),
                Some(Combine::Counter(name)) => acc.add_derived(name, value),
                None => {}
            }
        }
        for &flag in FLAG_KEYS {
            if self.item.flag(flag) {
                acc.set_flag(flag);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> StatAccumulator {
        let mut acc = StatAccumulator::new();
        acc.set_base(Stat::Health, 1000.0);
        acc.set_base(Stat::Speed, 1.0);
        acc.set_base(Stat::CritDamage, 1.5);
        acc
    }

    #[test]
    fn test_flat_and_rate_keys() {
        let item = EquipmentItem::new("amulet", "Amulet")
            .with_effect("maxHpFlat", 150)
            .with_effect("critChancePct", 10)
            .with_effect("physicalDamageReductionPct", 12);
        let mut acc = seeded();
        EquipmentSource::new(&item).apply(&mut acc);

        assert!((acc.value(Stat::Health) - 1150.0).abs() < f64::EPSILON);
        assert!((acc.value(Stat::CritChance) - 0.10).abs() < 1e-9);
        assert!((acc.value(Stat::PhysicalDamageReduction) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pct_on_multiplicative_stats_scales() {
        let item = EquipmentItem::new("gloves", "Gloves")
            .with_effect("attackSpeedPct", 20)
            .with_effect("critDamagePct", 20);
        let mut acc = seeded();
        EquipmentSource::new(&item).apply(&mut acc);

        assert!((acc.value(Stat::Speed) - 1.2).abs() < 1e-9);
        assert!((acc.value(Stat::CritDamage) - 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_keys_and_behaviours_are_ignored() {
        let item = EquipmentItem::new("trinket", "Trinket")
            .with_effect("sparkleFactor", 99)
            .with_effect("periodicHeal", serde_json::json!({ "amount": 20, "intervalSec": 3 }))
            .with_effect("poisonCanCrit", true);
        let mut acc = seeded();
        EquipmentSource::new(&item).apply(&mut acc);

        let stats = acc.finish();
        assert!(stats.derived.is_empty());
        assert!(stats.has_flag("poisonCanCrit"));
        assert!((stats.health - 1000.0).abs() < f64::EPSILON);
    }
}
