//! Ability system - ultimates, passives, status ticks and trigger hooks
//!
//! Purchased abilities whose effect key has a hook registered on a trigger
//! channel react when the combat controller fires that channel. Equipment
//! behaviours listen on the same channels after the hooks.

pub mod equipment;
pub mod hooks;
mod passives;
pub mod trigger;
mod ultimates;

pub use equipment::{behaviours, EquipmentBehaviour, ItemBehaviour};
pub use hooks::{HookContext, HookFn, HookRegistry};
pub use passives::PassiveOutcome;
pub use trigger::{Trigger, TriggerKind};
pub use ultimates::AbilityOutcome;

use crate::combat::{calculate_damage, fmt_amount, CombatEnv};
use crate::hero::{AbilityDescriptor, Hero};
use crate::status::{self, StackKind, StatusEvent};
use crate::types::DamageType;
use tracing::debug;

/// Frost stacks each frostbite pulse applies
const FROSTBITE_FROST_STACKS: u32 = 20;

/// Executes ability behaviour against a pair of heroes
#[derive(Debug, Clone)]
pub struct AbilitySystem {
    hooks: HookRegistry,
}

impl Default for AbilitySystem {
    fn default() -> Self {
        Self::new(HookRegistry::with_defaults())
    }
}

impl AbilitySystem {
    pub fn new(hooks: HookRegistry) -> Self {
        AbilitySystem { hooks }
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Fire `hero`'s hooks on a trigger channel, in purchase order
    ///
    /// Returns true as soon as a hook consumes the event; later hooks and
    /// equipment behaviours do not run in that case.
    pub fn trigger_abilities(&self, env: &mut CombatEnv<'_>, hero: &mut Hero, opponent: &mut Hero, trigger: Trigger) -> bool {
        let kind = trigger.kind();
        let fired: Vec<(HookFn, AbilityDescriptor)> = hero
            .purchased_abilities
            .iter()
            .filter_map(|ability| self.hooks.get(kind, &ability.effect).map(|hook| (hook, ability.clone())))
            .collect();

        for (hook, ability) in fired {
            debug!(hero = %hero.name, trigger = %kind, ability = %ability.name, "trigger fired");
            let mut ctx = HookContext {
                env: &mut *env,
                hero: &mut *hero,
                opponent: &mut *opponent,
                trigger,
            };
            if hook(&mut ctx, &ability) {
                return true;
            }
        }

        equipment::react(env, hero, opponent, trigger);
        false
    }

    /// Tick `hero`'s status effects, applying damage and narrating events
    ///
    /// Skeleton summons strike `opponent` through the damage formula.
    pub fn process_status_effects(&self, env: &mut CombatEnv<'_>, hero: &mut Hero, opponent: &mut Hero) {
        let result = status::process_status_effects(
            &mut hero.status_effects,
            hero.effective_stats.attack,
            env.damage_multiplier,
            env.constants.stacks.decay,
        );

        for event in result.events {
            match event {
                StatusEvent::PoisonStacks { damage, stacks } => {
                    hero.take_damage(damage);
                    env.log(format!(
                        "☠️ {} takes {} poison damage from {} stacks!",
                        hero.name,
                        fmt_amount(damage),
                        stacks
                    ));
                }
                StatusEvent::Burn { damage } => {
                    hero.take_damage(damage);
                    env.log(format!("🔥 {} takes {} burn damage!", hero.name, fmt_amount(damage)));
                }
                StatusEvent::Poison { damage } => {
                    hero.take_damage(damage);
                    env.log(format!("☠️ {} takes {} poison damage!", hero.name, fmt_amount(damage)));
                }
                StatusEvent::SkeletonAttack { raw_damage } => {
                    let damage = calculate_damage(env, raw_damage, opponent, DamageType::Physical, Some(&*hero));
                    opponent.take_damage(damage);
                    env.log(format!("💀 {}'s skeleton attacks for {} damage!", hero.name, fmt_amount(damage)));
                }
                StatusEvent::Expired { type_name } => {
                    env.log(format!("{} recovers from {}.", hero.name, type_name));
                }
            }
        }
    }

    /// Pulse an active frostbite window: damage plus frost on the opponent
    pub fn process_frostbite(&self, env: &mut CombatEnv<'_>, hero: &mut Hero, opponent: &mut Hero) {
        let Some(until) = hero.battle_flags.frostbite_until_ms else {
            return;
        };
        if env.now_ms >= until {
            hero.battle_flags.frostbite_until_ms = None;
            return;
        }

        let damage = hero.battle_flags.frostbite_damage;
        opponent.take_damage(damage);
        let frost = FROSTBITE_FROST_STACKS + hero.extra_stacks(StackKind::Frost);
        opponent.status_effects.add_stacks(StackKind::Frost, frost);

        let name = hero
            .purchased_abilities
            .iter()
            .find(|a| a.effect == "frostbite_stun")
            .map_or("Frostbite", |a| a.name.as_str());
        env.log(format!("{}'s {} deals {} damage and applies frost!", hero.name, name, fmt_amount(damage)));
    }
}
