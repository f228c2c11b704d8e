//! Damage formula and the per-call combat environment

use crate::combat::BattleLog;
use crate::config::CombatConstants;
use crate::hero::Hero;
use crate::status::StackKind;
use crate::types::DamageType;
use rand::{Rng, RngCore};

/// Everything a combat rule needs besides the two heroes
pub struct CombatEnv<'a> {
    pub log: &'a mut BattleLog,
    pub rng: &'a mut dyn RngCore,
    pub constants: &'a CombatConstants,
    /// Round escalation multiplier applied to every damage calculation
    pub damage_multiplier: f64,
    /// Battle time in milliseconds
    pub now_ms: u64,
}

impl<'a> CombatEnv<'a> {
    pub fn new(log: &'a mut BattleLog, rng: &'a mut dyn RngCore, constants: &'a CombatConstants) -> Self {
        CombatEnv {
            log,
            rng,
            constants,
            damage_multiplier: 1.0,
            now_ms: 0,
        }
    }

    pub fn with_damage_multiplier(mut self, multiplier: f64) -> Self {
        self.damage_multiplier = multiplier;
        self
    }

    pub fn with_now(mut self, now_ms: u64) -> Self {
        self.now_ms = now_ms;
        self
    }

    /// Roll a uniform value in `[0, 1)` and compare it with `chance`
    pub fn roll(&mut self, chance: f64) -> bool {
        self.rng.gen::<f64>() < chance
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.log.push(message);
    }
}

/// Format a number the way the battle log shows it: integers without decimals
pub fn fmt_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Compute the damage `target` takes from an `attack`-sized hit
///
/// Order of operations:
/// 1. percentage reduction from armor (physical) or magic reduction (magic)
/// 2. amplification read from the target
/// 3. a second flat percentage layer for physical hits
/// 4. the attacker's timed damage-output reduction
/// 5. shield stacks absorb, then the remainder decays
/// 6. the battle damage multiplier
///
/// The result is rounded and floored at the minimum damage, except when a
/// shield swallowed the whole hit. Shield stacks on `target` are consumed.
pub fn calculate_damage(
    env: &mut CombatEnv<'_>,
    attack: f64,
    target: &mut Hero,
    damage_type: DamageType,
    attacker: Option<&Hero>,
) -> f64 {
    let constants = env.constants;
    let limits = &constants.damage;
    let stats = &target.effective_stats;

    let (reduction, amplification) = match damage_type {
        DamageType::Physical => (stats.armor, stats.physical_damage_amplification),
        DamageType::Magic => (stats.magic_damage_reduction, stats.magic_damage_amplification),
    };
    let mut damage = attack * (1.0 - reduction.min(limits.max_reduction) / 100.0);
    damage *= 1.0 + amplification / 100.0;

    if damage_type == DamageType::Physical && stats.physical_damage_reduction > 0.0 {
        damage *= 1.0 - stats.physical_damage_reduction.min(limits.max_reduction) / 100.0;
    }

    if let Some(output) = attacker.and_then(|a| a.equipment_state.damage_output_reduction.as_ref()) {
        if output.is_active(env.now_ms) {
            let pct = match damage_type {
                DamageType::Physical => output.phys,
                DamageType::Magic => output.magic,
            };
            if pct != 0.0 {
                damage = (damage * (1.0 - pct / 100.0)).round();
            }
        }
    }

    let mut fully_absorbed = false;
    let shield = target.status_effects.stacks(StackKind::Shield);
    if shield > 0 {
        let absorbed = damage.min(shield as f64);
        damage -= absorbed;
        let remaining = ((shield as f64 - absorbed) * limits.shield_decay_on_hit).floor().max(0.0) as u32;
        target.status_effects.set_stacks(StackKind::Shield, remaining);
        target.battle_flags.shield_lost_this_period += (shield - remaining) as f64;
        if absorbed > 0.0 {
            env.log(format!("Shield absorbs {} damage!", fmt_amount(absorbed)));
        }
        fully_absorbed = damage <= 0.0;
    }

    damage *= env.damage_multiplier;

    if fully_absorbed {
        0.0
    } else {
        damage.round().max(limits.min_damage)
    }
}
