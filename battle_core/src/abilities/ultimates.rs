//! Ultimate abilities, cast when a hero's mana bar is full

use super::trigger::Trigger;
use super::AbilitySystem;
use crate::combat::{calculate_damage, fmt_amount, CombatEnv};
use crate::hero::Hero;
use crate::status::StatusEffect;
use crate::types::DamageType;
use serde::{Deserialize, Serialize};

// === Tuning ===

const GENERIC_MULTIPLIER: f64 = 1.5;
const FIREBALL_MULTIPLIER: f64 = 1.6;
const FIREBALL_BURN_PCT: f64 = 0.3;
const FIREBALL_BURN_TICKS: u32 = 3;
const CHARGE_MULTIPLIER: f64 = 1.4;
const CHARGE_STUN_TICKS: u32 = 1;
const SHIELD_BLOCK_REDUCTION: f64 = 0.5;
const SHIELD_BLOCK_TICKS: u32 = 3;
const BERSERKER_SPEED_BONUS: f64 = 0.5;
const BERSERKER_TICKS: u32 = 5;
const MAGIC_SHIELD_CHARGES: u32 = 3;
const TELEPORT_DODGE: f64 = 0.5;
const EVASION_DODGE: f64 = 0.75;
const DODGE_TICKS: u32 = 2;
const MULTI_SHOT_ARROWS: u32 = 3;
const MULTI_SHOT_MULTIPLIER: f64 = 0.7;
const POISON_ARROW_PCT: f64 = 0.25;
const POISON_ARROW_TICKS: u32 = 4;
const BACKSTAB_MULTIPLIER: f64 = 2.5;
const STEALTH_MULTIPLIER: f64 = 2.0;
const STEALTH_TICKS: u32 = 1;
const POISON_BLADE_PCT: f64 = 0.2;
const POISON_BLADE_DURATION: u32 = 3;
const POISON_BLADE_TICKS: u32 = 3;
const HOLY_STRIKE_MULTIPLIER: f64 = 1.8;
const HEAL_PCT: f64 = 0.3;
const DIVINE_SHIELD_TICKS: u32 = 2;
const LIFE_DRAIN_MULTIPLIER: f64 = 1.2;
const LIFE_DRAIN_HEAL_PCT: f64 = 0.5;
const SKELETON_ATTACK_PCT: f64 = 0.5;
const SKELETON_TICKS: u32 = 3;
const DEATH_COIL_HEAL_PCT: f64 = 0.4;
const DEATH_COIL_MULTIPLIER: f64 = 1.3;

/// What an ultimate did: damage dealt to the target plus effect tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityOutcome {
    pub damage: f64,
    pub effects: Vec<String>,
}

impl AbilityOutcome {
    fn new(damage: f64) -> Self {
        AbilityOutcome {
            damage,
            effects: Vec::new(),
        }
    }

    fn with_effect(mut self, tag: impl Into<String>) -> Self {
        self.effects.push(tag.into());
        self
    }
}

/// Hit `target` for `multiplier` times the caster's attack; returns the damage dealt
fn strike(env: &mut CombatEnv<'_>, caster: &Hero, target: &mut Hero, multiplier: f64, damage_type: DamageType) -> f64 {
    let damage = calculate_damage(env, caster.effective_stats.attack * multiplier, target, damage_type, Some(caster));
    target.take_damage(damage);
    damage
}

impl AbilitySystem {
    /// Cast the named ultimate from `caster` at `target`
    ///
    /// Unknown names fall through to a generic physical hit for 1.5x attack.
    /// Damage is applied here; callers must not subtract it again.
    pub fn execute_ability(&self, env: &mut CombatEnv<'_>, caster: &mut Hero, target: &mut Hero, name: &str) -> AbilityOutcome {
        match name {
            "Charge" => {
                let damage = strike(env, caster, target, CHARGE_MULTIPLIER, DamageType::Physical);
                target.status_effects.push(StatusEffect::Stun {
                    ticks_remaining: CHARGE_STUN_TICKS,
                });
                env.log(format!(
                    "⚡ {} charges forward with devastating force for {} damage! Target is stunned for {} turn(s).",
                    caster.name,
                    fmt_amount(damage),
                    CHARGE_STUN_TICKS
                ));
                AbilityOutcome::new(damage).with_effect(format!("stun:{}", CHARGE_STUN_TICKS))
            }
            "Shield Block" => {
                caster.status_effects.push(StatusEffect::DamageReduction {
                    reduction: SHIELD_BLOCK_REDUCTION,
                    ticks_remaining: SHIELD_BLOCK_TICKS,
                });
                env.log(format!(
                    "🛡️ {} raises shield to block incoming attacks reducing damage by {}% for {} turns!",
                    caster.name,
                    (SHIELD_BLOCK_REDUCTION * 100.0).round(),
                    SHIELD_BLOCK_TICKS
                ));
                AbilityOutcome::new(0.0).with_effect(format!("damage_reduction:{}:{}", SHIELD_BLOCK_REDUCTION, SHIELD_BLOCK_TICKS))
            }
            "Berserker" if caster.health_fraction() <= env.constants.abilities.berserker_below => {
                caster.status_effects.push(StatusEffect::AttackSpeed {
                    bonus: BERSERKER_SPEED_BONUS,
                    ticks_remaining: BERSERKER_TICKS,
                });
                env.log(format!(
                    "🔴 {} enters berserker rage gaining {}% attack speed for {} turns!",
                    caster.name,
                    (BERSERKER_SPEED_BONUS * 100.0).round(),
                    BERSERKER_TICKS
                ));
                AbilityOutcome::new(0.0).with_effect(format!("attack_speed:{}:{}", BERSERKER_SPEED_BONUS, BERSERKER_TICKS))
            }
            "Berserker" => {
                env.log(format!("{} is not wounded enough to enter berserker rage!", caster.name));
                self.generic(env, caster, target, name)
            }
            "Fireball" => {
                let damage = strike(env, caster, target, FIREBALL_MULTIPLIER, DamageType::Magic);
                let burn = (damage * FIREBALL_BURN_PCT).round();
                target.status_effects.push(StatusEffect::Burn {
                    damage: burn,
                    ticks_remaining: FIREBALL_BURN_TICKS,
                });
                env.log(format!(
                    "🔥 {} launches a burning Fireball for {} damage! Target burns for {} damage over {} turns.",
                    caster.name,
                    fmt_amount(damage),
                    fmt_amount(burn),
                    FIREBALL_BURN_TICKS
                ));
                AbilityOutcome::new(damage).with_effect(format!("burn:{}:{}", fmt_amount(burn), FIREBALL_BURN_TICKS))
            }
            "Magic Shield" => {
                caster.status_effects.push(StatusEffect::Absorption {
                    count: MAGIC_SHIELD_CHARGES,
                    ticks_remaining: MAGIC_SHIELD_CHARGES,
                });
                env.log(format!(
                    "🔮 {} conjures a magical shield that will absorb the next {} attacks!",
                    caster.name, MAGIC_SHIELD_CHARGES
                ));
                AbilityOutcome::new(0.0).with_effect(format!("absorption:{}", MAGIC_SHIELD_CHARGES))
            }
            "Teleport" => self.dodge(env, caster, TELEPORT_DODGE, "✨", "teleports to avoid attacks"),
            "Evasion" => self.dodge(env, caster, EVASION_DODGE, "💨", "enters evasive stance"),
            "Multi-Shot" => {
                let total: f64 = (0..MULTI_SHOT_ARROWS)
                    .map(|_| strike(env, caster, target, MULTI_SHOT_MULTIPLIER, DamageType::Physical))
                    .sum();
                env.log(format!(
                    "🏹 {} fires multiple arrows dealing {} total damage in {} hits!",
                    caster.name,
                    fmt_amount(total),
                    MULTI_SHOT_ARROWS
                ));
                AbilityOutcome::new(total).with_effect(format!("multishot:{}", MULTI_SHOT_ARROWS))
            }
            "Poison Arrow" => {
                let damage = strike(env, caster, target, 1.0, DamageType::Physical);
                let poison = (damage * POISON_ARROW_PCT).round();
                target.status_effects.push(StatusEffect::Poison {
                    damage: poison,
                    ticks_remaining: POISON_ARROW_TICKS,
                });
                env.log(format!(
                    "🏹 {} shoots a poison-tipped arrow for {} damage! Target is poisoned for {} damage over {} turns.",
                    caster.name,
                    fmt_amount(damage),
                    fmt_amount(poison),
                    POISON_ARROW_TICKS
                ));
                AbilityOutcome::new(damage).with_effect(format!("poison:{}:{}", fmt_amount(poison), POISON_ARROW_TICKS))
            }
            "Backstab" => {
                let damage = strike(env, caster, target, BACKSTAB_MULTIPLIER, DamageType::Physical);
                env.log(format!(
                    "🗡️ {} strikes with deadly precision for {} critical damage!",
                    caster.name,
                    fmt_amount(damage)
                ));
                AbilityOutcome::new(damage).with_effect("critical")
            }
            "Stealth" => {
                caster.status_effects.push(StatusEffect::Stealth {
                    attack_multiplier: STEALTH_MULTIPLIER,
                    ticks_remaining: STEALTH_TICKS,
                });
                env.log(format!(
                    "👤 {} vanishes into the shadows - next attack will deal {}% damage!",
                    caster.name,
                    (STEALTH_MULTIPLIER * 100.0).round()
                ));
                AbilityOutcome::new(0.0).with_effect(format!("stealth:{}:{}", STEALTH_MULTIPLIER, STEALTH_TICKS))
            }
            "Poison Blade" => {
                caster.status_effects.push(StatusEffect::PoisonBlade {
                    poison_percent: POISON_BLADE_PCT,
                    poison_duration: POISON_BLADE_DURATION,
                    ticks_remaining: POISON_BLADE_TICKS,
                });
                env.log(format!(
                    "🗡️ {} coats blade with deadly poison - attacks will apply poison for {} turns!",
                    caster.name, POISON_BLADE_TICKS
                ));
                AbilityOutcome::new(0.0).with_effect(format!(
                    "poison_blade:{}:{}:{}",
                    POISON_BLADE_PCT, POISON_BLADE_DURATION, POISON_BLADE_TICKS
                ))
            }
            "Holy Strike" => {
                let damage = (caster.effective_stats.attack * HOLY_STRIKE_MULTIPLIER).round();
                target.take_damage(damage);
                env.log(format!(
                    "⚡ {} strikes with divine power for {} divine damage (ignoring armor)!",
                    caster.name,
                    fmt_amount(damage)
                ));
                AbilityOutcome::new(damage).with_effect("holy_damage")
            }
            "Heal" => self.heal(env, caster, target),
            "Divine Shield" => {
                caster.status_effects.push(StatusEffect::Immunity {
                    ticks_remaining: DIVINE_SHIELD_TICKS,
                });
                env.log(format!(
                    "🛡️ {} becomes blessed with divine protection for {} turns!",
                    caster.name, DIVINE_SHIELD_TICKS
                ));
                AbilityOutcome::new(0.0).with_effect(format!("immunity:{}", DIVINE_SHIELD_TICKS))
            }
            "Life Drain" => {
                let damage = strike(env, caster, target, LIFE_DRAIN_MULTIPLIER, DamageType::Magic);
                let heal = (damage * LIFE_DRAIN_HEAL_PCT).round();
                caster.heal(heal);
                env.log(format!(
                    "💀 {} drains life force for {} damage and heals for {}!",
                    caster.name,
                    fmt_amount(damage),
                    fmt_amount(heal)
                ));
                AbilityOutcome::new(damage).with_effect(format!("lifedrain:{}", fmt_amount(heal)))
            }
            "Summon Skeleton" => {
                caster.status_effects.push(StatusEffect::Skeleton {
                    attack_percent: SKELETON_ATTACK_PCT,
                    ticks_remaining: SKELETON_TICKS,
                });
                env.log(format!(
                    "💀 {} summons an undead skeleton that will attack for {} turns!",
                    caster.name, SKELETON_TICKS
                ));
                AbilityOutcome::new(0.0).with_effect(format!("skeleton:{}:{}", SKELETON_ATTACK_PCT, SKELETON_TICKS))
            }
            "Death Coil" if caster.health_fraction() < env.constants.abilities.death_coil_below => {
                let heal = (caster.max_health() * DEATH_COIL_HEAL_PCT).round();
                caster.heal(heal);
                env.log(format!("💀 {} channels dark energy to heal for {} health!", caster.name, fmt_amount(heal)));
                AbilityOutcome::new(0.0).with_effect(format!("heal:{}", fmt_amount(heal)))
            }
            "Death Coil" => {
                let damage = strike(env, caster, target, DEATH_COIL_MULTIPLIER, DamageType::Magic);
                env.log(format!("💀 {} channels dark energy to damage enemy for {}!", caster.name, fmt_amount(damage)));
                AbilityOutcome::new(damage).with_effect("death_coil_damage")
            }
            _ => self.generic(env, caster, target, name),
        }
    }

    fn generic(&self, env: &mut CombatEnv<'_>, caster: &Hero, target: &mut Hero, name: &str) -> AbilityOutcome {
        let damage = strike(env, caster, target, GENERIC_MULTIPLIER, DamageType::Physical);
        env.log(format!("✨ {} uses {} for {} damage!", caster.name, name, fmt_amount(damage)));
        AbilityOutcome::new(damage)
    }

    fn dodge(&self, env: &mut CombatEnv<'_>, caster: &mut Hero, chance: f64, emoji: &str, message: &str) -> AbilityOutcome {
        caster.status_effects.push(StatusEffect::Dodge {
            chance,
            ticks_remaining: DODGE_TICKS,
        });
        env.log(format!(
            "{} {} {} gaining {}% dodge chance for {} turns!",
            emoji,
            caster.name,
            message,
            (chance * 100.0).round(),
            DODGE_TICKS
        ));
        AbilityOutcome::new(0.0).with_effect(format!("dodge:{}:{}", chance, DODGE_TICKS))
    }

    fn heal(&self, env: &mut CombatEnv<'_>, caster: &mut Hero, target: &mut Hero) -> AbilityOutcome {
        let mut amount = (caster.max_health() * HEAL_PCT).round();
        let window_ms = env.constants.abilities.heal_double_window_ms;
        let doubled = caster
            .battle_flags
            .low_hp_heal_double_since_ms
            .is_some_and(|since| env.now_ms.saturating_sub(since) < window_ms);
        if doubled {
            amount *= 2.0;
        }
        caster.heal(amount);

        self.trigger_abilities(env, caster, target, Trigger::OnHeal);
        self.trigger_abilities(env, caster, target, Trigger::HealThresholdCheck { heal_amount: amount });

        env.log(format!(
            "✨ {} channels divine healing energy and restores {} health!",
            caster.name,
            fmt_amount(amount)
        ));
        AbilityOutcome::new(0.0).with_effect(format!("heal:{}", fmt_amount(amount)))
    }
}
