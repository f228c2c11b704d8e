//! Hero - the mutable combatant for one side of a battle

mod equipment_state;
mod template;

pub use equipment_state::{DamageOutputReduction, EquipmentState, ManaRegenDebuff};
pub use template::{AbilityDescriptor, AbilityRef, BaseStats, EquipmentItem, HeroAbilities, HeroTemplate};

use crate::abilities::{behaviours, ItemBehaviour};
use crate::source::{BaseStatsSource, StatSource};
use crate::stat_block::{EffectiveStats, StatAccumulator};
use crate::status::{StackKind, StatusEffects};
use crate::types::Stat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-battle scratch state owned by trigger hooks and equipment behaviours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleFlags {
    /// Max health gained during the battle (drums)
    pub bonus_max_health: f64,
    /// Death-save charges already spent; survives stat recomputes
    pub death_saves_used: u32,
    /// Shield stacks absorbed since the last shield-loss tick
    pub shield_lost_this_period: f64,
    /// Healing counted towards the next heal-threshold burst
    pub heal_threshold_progress: f64,
    pub low_hp_poison_burst_used: bool,
    pub death_immunity_used: bool,
    pub self_poison_reflect: bool,
    pub cold_embrace_since_ms: Option<u64>,
    pub low_hp_heal_double_since_ms: Option<u64>,
    /// Frostbite keeps hitting the opponent until this battle time
    pub frostbite_until_ms: Option<u64>,
    pub frostbite_damage: f64,
    /// Last battle time an equipment behaviour fired, by behaviour key
    pub last_fired_ms: BTreeMap<String, u64>,
    /// Once-per-battle behaviours already used
    pub spent: BTreeSet<String>,
}

/// A combatant instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    // === Identity ===
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,

    // === Stats ===
    /// Source of truth; never modified by combat
    pub stats: BaseStats,
    #[serde(default)]
    pub abilities: HeroAbilities,
    /// Derived from stats, purchases and equipment by the stats calculator
    #[serde(default)]
    pub effective_stats: EffectiveStats,

    // === Battle state ===
    pub current_health: f64,
    pub current_mana: f64,
    pub max_mana: f64,
    #[serde(default)]
    pub status_effects: StatusEffects,

    // === Loadout ===
    #[serde(default)]
    pub purchased_abilities: Vec<AbilityDescriptor>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
    /// Structured behaviours parsed from `equipment`
    #[serde(skip)]
    pub item_behaviours: Vec<ItemBehaviour>,

    // === Scratch ===
    #[serde(default)]
    pub equipment_state: EquipmentState,
    #[serde(default)]
    pub battle_flags: BattleFlags,
}

impl Hero {
    /// Create a hero at full health from a catalog template
    pub fn from_template(template: &HeroTemplate) -> Self {
        let mut acc = StatAccumulator::new();
        BaseStatsSource::new(&template.stats).apply(&mut acc);
        let effective_stats = acc.finish();

        Hero {
            id: template.id.clone(),
            name: template.name.clone(),
            avatar: template.avatar.clone(),
            stats: template.stats.clone(),
            abilities: template.abilities.clone(),
            current_health: effective_stats.health,
            effective_stats,
            current_mana: 0.0,
            max_mana: 100.0,
            status_effects: StatusEffects::new(),
            purchased_abilities: Vec::new(),
            equipment: Vec::new(),
            item_behaviours: Vec::new(),
            equipment_state: EquipmentState::default(),
            battle_flags: BattleFlags::default(),
        }
    }

    /// Add a purchased ability
    pub fn with_ability(mut self, ability: AbilityDescriptor) -> Self {
        self.purchased_abilities.push(ability);
        self
    }

    /// Add a piece of equipment
    pub fn with_equipment(mut self, item: EquipmentItem) -> Self {
        self.equip(item);
        self
    }

    /// Equip an item and parse its behaviours
    pub fn equip(&mut self, item: EquipmentItem) {
        self.equipment.push(item);
        self.refresh_item_behaviours();
    }

    /// Re-parse equipment behaviours after `equipment` was edited directly
    pub fn refresh_item_behaviours(&mut self) {
        self.item_behaviours = behaviours(&self.equipment);
    }

    /// Health cap: effective health plus anything gained mid-battle
    pub fn max_health(&self) -> f64 {
        self.effective_stats.health + self.battle_flags.bonus_max_health
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    /// Current health as a fraction of max (0 when max is 0)
    pub fn health_fraction(&self) -> f64 {
        let max = self.max_health();
        if max > 0.0 {
            self.current_health / max
        } else {
            0.0
        }
    }

    /// Health lost so far
    pub fn missing_health(&self) -> f64 {
        (self.max_health() - self.current_health).max(0.0)
    }

    /// Set health, clamped to `[0, max_health]`
    pub fn set_health(&mut self, value: f64) {
        self.current_health = value.clamp(0.0, self.max_health().max(0.0));
    }

    /// Heal up to max; returns the amount actually restored
    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.current_health;
        self.set_health(before + amount.max(0.0));
        self.current_health - before
    }

    /// Lose health down to 0; returns the amount actually removed
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        let before = self.current_health;
        self.set_health(before - amount.max(0.0));
        before - self.current_health
    }

    /// Gain mana up to max
    pub fn restore_mana(&mut self, amount: f64) {
        self.current_mana = (self.current_mana + amount).clamp(0.0, self.max_mana);
    }

    pub fn has_full_mana(&self) -> bool {
        self.current_mana >= self.max_mana
    }

    /// Extra stacks this hero adds whenever it applies `kind`
    pub fn extra_stacks(&self, kind: StackKind) -> u32 {
        let extra = match kind {
            StackKind::Poison => self.effective_stats.get(Stat::ExtraPoisonStacks),
            StackKind::Frost => self.effective_stats.get(Stat::ExtraFrostStacks),
            StackKind::Shield => self.effective_stats.get(Stat::ExtraShieldStacks),
        };
        extra.max(0.0).round() as u32
    }

    /// Spend one death-save charge if any is left
    pub fn consume_death_save(&mut self) -> bool {
        if self.effective_stats.death_saves() == 0 {
            return false;
        }
        self.effective_stats.death_save_charges -= 1.0;
        self.battle_flags.death_saves_used += 1;
        true
    }

    /// Reset battle state: full health, empty mana, no effects or scratch flags
    pub fn reset_for_battle(&mut self, max_mana: f64) {
        self.battle_flags = BattleFlags::default();
        self.equipment_state = EquipmentState::default();
        self.status_effects.clear();
        self.max_mana = max_mana;
        self.current_mana = 0.0;
        self.current_health = self.max_health();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight() -> Hero {
        let template = HeroTemplate::new("knight", "Knight", BaseStats::new(500.0, 40.0, 10.0, 1.0));
        Hero::from_template(&template)
    }

    #[test]
    fn test_from_template_starts_full() {
        let hero = knight();
        assert!((hero.current_health - 500.0).abs() < f64::EPSILON);
        assert!((hero.current_mana - 0.0).abs() < f64::EPSILON);
        assert!((hero.max_mana - 100.0).abs() < f64::EPSILON);
        assert!((hero.effective_stats.attack - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heal_and_damage_are_clamped() {
        let mut hero = knight();
        assert!((hero.take_damage(120.0) - 120.0).abs() < f64::EPSILON);
        assert!((hero.heal(500.0) - 120.0).abs() < f64::EPSILON);
        assert!((hero.current_health - 500.0).abs() < f64::EPSILON);

        assert!((hero.take_damage(9999.0) - 500.0).abs() < f64::EPSILON);
        assert!(!hero.is_alive());
        assert!((hero.take_damage(-50.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bonus_max_health_raises_cap() {
        let mut hero = knight();
        hero.battle_flags.bonus_max_health = 200.0;
        hero.heal(1000.0);
        assert!((hero.current_health - 700.0).abs() < f64::EPSILON);
        assert!((hero.health_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mana_clamped() {
        let mut hero = knight();
        hero.restore_mana(250.0);
        assert!(hero.has_full_mana());
        assert!((hero.current_mana - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_consume_death_save() {
        let mut hero = knight();
        hero.effective_stats.death_save_charges = 1.0;
        assert!(hero.consume_death_save());
        assert!(!hero.consume_death_save());
        assert_eq!(hero.effective_stats.death_saves(), 0);
        assert_eq!(hero.battle_flags.death_saves_used, 1);
    }

    #[test]
    fn test_equip_parses_behaviours_once() {
        let mut hero = knight();
        hero.equip(
            EquipmentItem::new("javelin", "Javelin")
                .with_effect("attackSpeedPct", 10)
                .with_effect("onHitMagicProc", serde_json::json!({ "chancePct": 25, "bonusDamage": 40 })),
        );
        assert_eq!(hero.item_behaviours.len(), 1);
        assert_eq!(hero.item_behaviours[0].key, "javelin#0:onHitMagicProc");

        hero.equipment.push(EquipmentItem::new("mango", "Mango").with_effect("manaOnBattleStart", 20));
        assert_eq!(hero.item_behaviours.len(), 1);
        hero.refresh_item_behaviours();
        assert_eq!(hero.item_behaviours.len(), 2);
    }
}
