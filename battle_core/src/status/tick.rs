//! Status tick processing

use super::{StatusEffect, StatusEffects};

/// Something that happened while ticking a hero's status effects, in list order
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    /// Poison stacks hurt their carrier; `stacks` is the count before decay
    PoisonStacks { damage: f64, stacks: u32 },
    Burn { damage: f64 },
    Poison { damage: f64 },
    /// A summoned skeleton swings at the opponent for this raw amount
    SkeletonAttack { raw_damage: f64 },
    /// A timed effect ran out
    Expired { type_name: &'static str },
}

/// Result of processing one status tick
#[derive(Debug, Clone, Default)]
pub struct StatusTickResult {
    pub events: Vec<StatusEvent>,
    /// Damage the carrier takes from its own effects
    pub total_damage: f64,
}

impl StatusTickResult {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_damage(&mut self, event: StatusEvent, damage: f64) {
        self.total_damage += damage;
        self.events.push(event);
    }

    /// Names of effects that expired this tick
    pub fn expired(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.events.iter().filter_map(|e| match e {
            StatusEvent::Expired { type_name } => Some(*type_name),
            _ => None,
        })
    }
}

/// Process a single status tick for one hero
///
/// Poison stacks deal `max(1, stacks)` and then decay; frost stacks only
/// decay; shield stacks persist while at least one remains. Timed effects
/// fire (burn and poison scaled by `damage_multiplier`), count down, and are
/// dropped at zero. Applying damage is left to the caller.
pub fn process_status_effects(
    effects: &mut StatusEffects,
    owner_attack: f64,
    damage_multiplier: f64,
    stack_decay: f64,
) -> StatusTickResult {
    let mut result = StatusTickResult::new();
    let decay = |stacks: u32| (stacks as f64 * stack_decay).floor() as u32;

    let mut kept = Vec::with_capacity(effects.len());
    for mut effect in effects.take() {
        match &mut effect {
            StatusEffect::PoisonStacks { stacks } => {
                let damage = (*stacks).max(1) as f64;
                result.push_damage(StatusEvent::PoisonStacks { damage, stacks: *stacks }, damage);
                *stacks = decay(*stacks);
                if *stacks >= 1 {
                    kept.push(effect);
                }
                continue;
            }
            StatusEffect::FrostStacks { stacks } => {
                *stacks = decay(*stacks);
                if *stacks >= 1 {
                    kept.push(effect);
                }
                continue;
            }
            StatusEffect::ShieldStacks { stacks } => {
                if *stacks >= 1 {
                    kept.push(effect);
                }
                continue;
            }
            StatusEffect::Burn { damage, .. } => {
                let damage = (*damage * damage_multiplier).round();
                result.push_damage(StatusEvent::Burn { damage }, damage);
            }
            StatusEffect::Poison { damage, .. } => {
                let damage = (*damage * damage_multiplier).round();
                result.push_damage(StatusEvent::Poison { damage }, damage);
            }
            StatusEffect::Skeleton { attack_percent, .. } => {
                let raw_damage = (owner_attack * *attack_percent).round();
                result.events.push(StatusEvent::SkeletonAttack { raw_damage });
            }
            _ => {}
        }

        let type_name = effect.type_name();
        match effect.ticks_remaining_mut() {
            Some(ticks) if *ticks > 0 => {
                *ticks -= 1;
                if *ticks > 0 {
                    kept.push(effect);
                } else {
                    result.events.push(StatusEvent::Expired { type_name });
                }
            }
            // already spent before this tick
            _ => {}
        }
    }

    effects.restore(kept);
    result
}
