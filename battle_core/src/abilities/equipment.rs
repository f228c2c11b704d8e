//! Equipment behaviours - nested item effects that act during combat
//!
//! Flat numeric item modifiers are folded into effective stats by the
//! stats calculator. The structured entries handled here react to trigger
//! channels instead: cooldown clocks, periodic effects, on-hit procs and
//! once-per-battle thresholds.

use super::trigger::Trigger;
use crate::combat::{calculate_damage, fmt_amount, CombatEnv};
use crate::hero::{EquipmentItem, Hero, ManaRegenDebuff};
use crate::status::StackKind;
use crate::types::DamageType;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodicDamage {
    pub amount: f64,
    pub interval_sec: f64,
    #[serde(default = "default_damage_type")]
    pub damage_type: DamageType,
}

fn default_damage_type() -> DamageType {
    DamageType::Physical
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnHitMagicProc {
    pub chance_pct: f64,
    pub bonus_damage: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodicHeal {
    pub amount: f64,
    pub interval_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldThreshold {
    pub hp_pct: f64,
    pub stacks: u32,
    #[serde(default)]
    pub once_per_battle: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldOnPhysicalHit {
    pub chance_pct: f64,
    pub stacks: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdFrostBurst {
    pub hp_pct: f64,
    #[serde(default)]
    pub heal: f64,
    #[serde(default)]
    pub enemy_frost_stacks: u32,
    #[serde(default)]
    pub once_per_battle: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyUltimateDebuff {
    pub mana_regen_delta: f64,
    pub duration_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodicPoison {
    pub stacks: u32,
    pub interval_sec: f64,
}

/// A structured equipment effect
#[derive(Debug, Clone, PartialEq)]
pub enum EquipmentBehaviour {
    /// Evade the next hit once the cooldown has elapsed
    EvadeCooldown { cooldown_sec: f64 },
    GuaranteedCritCooldown { cooldown_sec: f64 },
    PeriodicDamage(PeriodicDamage),
    PeriodicHeal(PeriodicHeal),
    PeriodicPoison(PeriodicPoison),
    HealOnCritTaken { amount: f64 },
    OnHitMagicProc(OnHitMagicProc),
    ManaOnBattleStart { amount: f64 },
    ShieldThreshold(ShieldThreshold),
    ShieldOnPhysicalHit(ShieldOnPhysicalHit),
    ThresholdFrostBurst(ThresholdFrostBurst),
    EnemyUltimateDebuff(EnemyUltimateDebuff),
}

impl EquipmentBehaviour {
    /// Parse one item effect entry; keys without a behaviour give `None`
    pub fn parse(key: &str, value: &serde_json::Value) -> Option<Self> {
        fn nested<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Option<T> {
            serde_json::from_value(value.clone()).ok()
        }

        let behaviour = match key {
            "evadePhysicalCooldownSec" => EquipmentBehaviour::EvadeCooldown {
                cooldown_sec: value.as_f64()?,
            },
            "guaranteedCritCooldownSec" => EquipmentBehaviour::GuaranteedCritCooldown {
                cooldown_sec: value.as_f64()?,
            },
            "healOnCritTaken" => EquipmentBehaviour::HealOnCritTaken { amount: value.as_f64()? },
            "manaOnBattleStart" => EquipmentBehaviour::ManaOnBattleStart { amount: value.as_f64()? },
            "periodicDamage" => EquipmentBehaviour::PeriodicDamage(nested(value)?),
            "periodicHeal" => EquipmentBehaviour::PeriodicHeal(nested(value)?),
            "periodicApplyPoison" => EquipmentBehaviour::PeriodicPoison(nested(value)?),
            "onHitMagicProc" => EquipmentBehaviour::OnHitMagicProc(nested(value)?),
            "shieldThreshold" => EquipmentBehaviour::ShieldThreshold(nested(value)?),
            "onPhysicalDamageGainShield" => EquipmentBehaviour::ShieldOnPhysicalHit(nested(value)?),
            "thresholdFrostBurst" => EquipmentBehaviour::ThresholdFrostBurst(nested(value)?),
            "onEnemyUltimate" => EquipmentBehaviour::EnemyUltimateDebuff(nested(value)?),
            _ => return None,
        };
        Some(behaviour)
    }

    /// Period in battle milliseconds, for clocked behaviours
    pub fn period_ms(&self) -> Option<u64> {
        let secs = match self {
            EquipmentBehaviour::EvadeCooldown { cooldown_sec }
            | EquipmentBehaviour::GuaranteedCritCooldown { cooldown_sec } => *cooldown_sec,
            EquipmentBehaviour::PeriodicDamage(p) => p.interval_sec,
            EquipmentBehaviour::PeriodicHeal(p) => p.interval_sec,
            EquipmentBehaviour::PeriodicPoison(p) => p.interval_sec,
            _ => return None,
        };
        Some((secs.max(0.0) * 1000.0).round() as u64)
    }
}

/// One behaviour together with the item that carries it
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBehaviour {
    pub item_name: String,
    /// Clock key in battle flags, unique per item and behaviour
    pub key: String,
    pub behaviour: EquipmentBehaviour,
}

/// Every behaviour on a hero's equipment, in equip order
pub fn behaviours(equipment: &[EquipmentItem]) -> Vec<ItemBehaviour> {
    equipment
        .iter()
        .enumerate()
        .flat_map(|(slot, item)| {
            item.effects.iter().filter_map(move |(key, value)| {
                EquipmentBehaviour::parse(key, value).map(|behaviour| ItemBehaviour {
                    item_name: item.name.clone(),
                    key: format!("{}#{}:{}", item.item_type, slot, key),
                    behaviour,
                })
            })
        })
        .collect()
}

/// Run the equipment side of a trigger channel for `hero`
pub(crate) fn react(env: &mut CombatEnv<'_>, hero: &mut Hero, opponent: &mut Hero, trigger: Trigger) {
    if trigger == Trigger::BattleStart {
        hero.equipment_state.enemy_miss_chance_bonus_pct = hero.effective_stats.enemy_miss_chance_bonus_pct;
    }

    let entries = std::mem::take(&mut hero.item_behaviours);
    for entry in &entries {
        match trigger {
            Trigger::BattleStart => on_battle_start(env, hero, entry),
            Trigger::EquipmentTick => {
                on_clock(env, hero, opponent, entry);
                on_threshold(env, hero, opponent, entry);
            }
            Trigger::OnAttack => on_attack(env, hero, entry),
            Trigger::OnDamageTaken { was_crit, damage_type } => {
                on_damage_taken(env, hero, entry, was_crit, damage_type);
                on_threshold(env, hero, opponent, entry);
            }
            Trigger::OnEnemyUltimate => on_enemy_ultimate(env, hero, opponent, entry),
            _ => {}
        }
    }
    hero.item_behaviours = entries;
}

fn on_battle_start(env: &mut CombatEnv<'_>, hero: &mut Hero, entry: &ItemBehaviour) {
    if entry.behaviour.period_ms().is_some() {
        hero.battle_flags.last_fired_ms.insert(entry.key.clone(), env.now_ms);
    }
    if let EquipmentBehaviour::ManaOnBattleStart { amount } = entry.behaviour {
        hero.restore_mana(amount);
        env.log(format!("{}'s {} grants {} mana!", hero.name, entry.item_name, fmt_amount(amount)));
    }
}

/// Whether a clocked behaviour is due; restarts its clock when it is
fn take_due(env: &CombatEnv<'_>, hero: &mut Hero, entry: &ItemBehaviour) -> bool {
    let Some(period) = entry.behaviour.period_ms() else {
        return false;
    };
    let last = hero.battle_flags.last_fired_ms.get(&entry.key).copied().unwrap_or(0);
    if env.now_ms.saturating_sub(last) < period {
        return false;
    }
    hero.battle_flags.last_fired_ms.insert(entry.key.clone(), env.now_ms);
    true
}

fn on_clock(env: &mut CombatEnv<'_>, hero: &mut Hero, opponent: &mut Hero, entry: &ItemBehaviour) {
    if !take_due(env, hero, entry) {
        return;
    }
    debug!(hero = %hero.name, item = %entry.item_name, key = %entry.key, "equipment behaviour fired");

    match &entry.behaviour {
        EquipmentBehaviour::EvadeCooldown { .. } => hero.equipment_state.auto_evade_ready = true,
        EquipmentBehaviour::GuaranteedCritCooldown { .. } => hero.equipment_state.force_crit = true,
        EquipmentBehaviour::PeriodicDamage(periodic) => {
            let damage = calculate_damage(env, periodic.amount, opponent, periodic.damage_type, Some(&*hero));
            let dealt = opponent.take_damage(damage);
            env.log(format!("{}'s {} deals {} damage!", hero.name, entry.item_name, fmt_amount(dealt)));
        }
        EquipmentBehaviour::PeriodicHeal(periodic) => {
            let healed = hero.heal(periodic.amount);
            if healed > 0.0 {
                env.log(format!("{}'s {} restores {} HP!", hero.name, entry.item_name, fmt_amount(healed)));
            }
        }
        EquipmentBehaviour::PeriodicPoison(periodic) => {
            let stacks = periodic.stacks + hero.extra_stacks(StackKind::Poison);
            opponent.status_effects.add_stacks(StackKind::Poison, stacks);
            env.log(format!("{}'s {} applies {} poison stacks!", hero.name, entry.item_name, stacks));
        }
        _ => {}
    }
}

fn on_threshold(env: &mut CombatEnv<'_>, hero: &mut Hero, opponent: &mut Hero, entry: &ItemBehaviour) {
    let (hp_pct, once) = match &entry.behaviour {
        EquipmentBehaviour::ShieldThreshold(t) => (t.hp_pct, t.once_per_battle),
        EquipmentBehaviour::ThresholdFrostBurst(t) => (t.hp_pct, t.once_per_battle),
        _ => return,
    };
    if !hero.is_alive() || hero.health_fraction() * 100.0 > hp_pct {
        return;
    }
    if once && !hero.battle_flags.spent.insert(entry.key.clone()) {
        return;
    }

    match &entry.behaviour {
        EquipmentBehaviour::ShieldThreshold(t) => {
            let stacks = t.stacks + hero.extra_stacks(StackKind::Shield);
            hero.status_effects.add_stacks(StackKind::Shield, stacks);
            env.log(format!("{}'s {} grants {} shield stacks!", hero.name, entry.item_name, stacks));
        }
        EquipmentBehaviour::ThresholdFrostBurst(t) => {
            let healed = hero.heal(t.heal);
            let stacks = if t.enemy_frost_stacks > 0 {
                t.enemy_frost_stacks + hero.extra_stacks(StackKind::Frost)
            } else {
                0
            };
            opponent.status_effects.add_stacks(StackKind::Frost, stacks);
            env.log(format!(
                "{}'s {} restores {} HP and applies {} frost stacks!",
                hero.name,
                entry.item_name,
                fmt_amount(healed),
                stacks
            ));
        }
        _ => {}
    }
}

fn on_attack(env: &mut CombatEnv<'_>, hero: &mut Hero, entry: &ItemBehaviour) {
    if let EquipmentBehaviour::OnHitMagicProc(proc_) = &entry.behaviour {
        if env.roll(proc_.chance_pct / 100.0) {
            hero.equipment_state.on_hit_bonus_magic += proc_.bonus_damage;
        }
    }
}

fn on_damage_taken(env: &mut CombatEnv<'_>, hero: &mut Hero, entry: &ItemBehaviour, was_crit: bool, damage_type: DamageType) {
    match &entry.behaviour {
        EquipmentBehaviour::HealOnCritTaken { amount } if was_crit => {
            let healed = hero.heal(*amount);
            env.log(format!("{}'s {} restores {} HP!", hero.name, entry.item_name, fmt_amount(healed)));
        }
        EquipmentBehaviour::ShieldOnPhysicalHit(shield) if damage_type == DamageType::Physical => {
            if env.roll(shield.chance_pct / 100.0) {
                let stacks = shield.stacks + hero.extra_stacks(StackKind::Shield);
                hero.status_effects.add_stacks(StackKind::Shield, stacks);
                env.log(format!("{}'s {} grants {} shield stacks!", hero.name, entry.item_name, stacks));
            }
        }
        _ => {}
    }
}

fn on_enemy_ultimate(env: &mut CombatEnv<'_>, hero: &Hero, caster: &mut Hero, entry: &ItemBehaviour) {
    if let EquipmentBehaviour::EnemyUltimateDebuff(debuff) = &entry.behaviour {
        let duration_ms = (debuff.duration_sec.max(0.0) * 1000.0).round() as u64;
        caster.equipment_state.mana_regen_debuffs.push(ManaRegenDebuff {
            delta: debuff.mana_regen_delta,
            until_ms: Some(env.now_ms + duration_ms),
        });
        env.log(format!("{}'s {} disrupts {}'s mana flow!", hero.name, entry.item_name, caster.name));
    }
}
