//! Purchased-ability hooks, keyed by trigger channel and effect key

use super::trigger::{Trigger, TriggerKind};
use crate::combat::{fmt_amount, CombatEnv};
use crate::config::AbilityConstants;
use crate::hero::{AbilityDescriptor, Hero};
use crate::status::{StackKind, StatusEffect};
use std::collections::HashMap;
use std::fmt;

// === Tuning ===

const REACTIVE_POISON: u32 = 4;
const REACTIVE_FROST: u32 = 5;
const REACTIVE_SHIELD: u32 = 4;
const REACTIVE_HEAL: f64 = 10.0;
const CRIT_HEAL: f64 = 20.0;
const REACTIVE_MANA: f64 = 3.0;
const DAMAGE_TAKEN_POISON: u32 = 8;
const DAMAGE_TAKEN_FROST: u32 = 12;
const HEAL_PROC_DAMAGE: f64 = 100.0;
const HP_LOSS_MIN_STACKS: u32 = 3;
const DRUMS_MAX_HP_GAIN: f64 = 200.0;
const SHIELD_LOSS_REFUND: f64 = 0.15;
/// Stun ticks applied by frostbite at battle start
const FROSTBITE_STUN_TICKS: u32 = 2;

/// What a hook sees when it fires
pub struct HookContext<'a, 'e> {
    pub env: &'a mut CombatEnv<'e>,
    /// Owner of the ability
    pub hero: &'a mut Hero,
    pub opponent: &'a mut Hero,
    pub trigger: Trigger,
}

impl HookContext<'_, '_> {
    /// Give the opponent stacks, plus the owner's extra stacks of that kind
    pub fn stack_opponent(&mut self, kind: StackKind, stacks: u32) {
        if stacks > 0 {
            let extra = self.hero.extra_stacks(kind);
            self.opponent.status_effects.add_stacks(kind, stacks + extra);
        }
    }

    /// Give the owner stacks, plus its own extra stacks of that kind
    pub fn stack_self(&mut self, kind: StackKind, stacks: u32) {
        if stacks > 0 {
            let extra = self.hero.extra_stacks(kind);
            self.hero.status_effects.add_stacks(kind, stacks + extra);
        }
    }

    /// Regenerate health, boosted by extra regen and cut by the opponent's regen reduction
    pub fn regenerate(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let boosted = amount + self.hero.effective_stats.extra_regen_stacks.max(0.0);
        let cut = (self.opponent.effective_stats.derived("enemyRegenReductionPct") / 100.0).clamp(0.0, 1.0);
        self.hero.heal((boosted * (1.0 - cut)).round())
    }

    /// Log `"{hero}'s {ability} {text}"`
    pub fn announce(&mut self, ability: &AbilityDescriptor, text: &str) {
        let line = format!("{}'s {} {}", self.hero.name, ability.name, text);
        self.env.log(line);
    }
}

/// A hook returns true when it consumed the event (only meaningful for death saves)
pub type HookFn = fn(&mut HookContext<'_, '_>, &AbilityDescriptor) -> bool;

/// Channel-keyed hook registry
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<TriggerKind, HashMap<String, HookFn>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self
            .hooks
            .iter()
            .flat_map(|(kind, by_key)| by_key.keys().map(move |key| format!("{}:{}", kind, key)))
            .collect();
        keys.sort();
        f.debug_struct("HookRegistry").field("hooks", &keys).finish()
    }
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in hook
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for &(kind, key, hook) in DEFAULT_HOOKS {
            registry.register(kind, key, hook);
        }
        registry
    }

    /// Register (or replace) the hook an effect key runs on a channel
    pub fn register(&mut self, kind: TriggerKind, key: impl Into<String>, hook: HookFn) {
        self.hooks.entry(kind).or_default().insert(key.into(), hook);
    }

    pub fn get(&self, kind: TriggerKind, key: &str) -> Option<HookFn> {
        self.hooks.get(&kind).and_then(|by_key| by_key.get(key)).copied()
    }

    /// Number of hooks on a channel
    pub fn channel_len(&self, kind: TriggerKind) -> usize {
        self.hooks.get(&kind).map_or(0, HashMap::len)
    }

    pub fn len(&self) -> usize {
        self.hooks.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn stacks(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

// === Reactive families (attack, evade, crit, heal) ===

#[derive(Clone, Copy)]
enum Reaction {
    PoisonOpponent(u32),
    FrostOpponent(u32),
    ShieldSelf(u32),
    Heal(f64),
    Mana(f64),
}

fn react(ctx: &mut HookContext<'_, '_>, ability: &AbilityDescriptor, reaction: Reaction, text: &str) -> bool {
    match reaction {
        Reaction::PoisonOpponent(n) => ctx.stack_opponent(StackKind::Poison, n),
        Reaction::FrostOpponent(n) => ctx.stack_opponent(StackKind::Frost, n),
        Reaction::ShieldSelf(n) => ctx.stack_self(StackKind::Shield, n),
        Reaction::Heal(amount) => {
            ctx.hero.heal(amount);
        }
        Reaction::Mana(amount) => ctx.hero.restore_mana(amount),
    }
    ctx.announce(ability, text);
    false
}

fn react_with_chance(
    ctx: &mut HookContext<'_, '_>,
    ability: &AbilityDescriptor,
    chance: fn(&AbilityConstants) -> f64,
    reaction: Reaction,
    text: &str,
) -> bool {
    let chance = chance(&ctx.env.constants.abilities);
    if ctx.env.roll(chance) {
        react(ctx, ability, reaction, text);
    }
    false
}

fn attack_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_attack_chance, Reaction::PoisonOpponent(REACTIVE_POISON), "applies poison!")
}

fn attack_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_attack_chance, Reaction::FrostOpponent(REACTIVE_FROST), "applies frost!")
}

fn attack_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_attack_chance, Reaction::ShieldSelf(REACTIVE_SHIELD), "grants shield!")
}

fn attack_heal(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_attack_chance, Reaction::Heal(REACTIVE_HEAL), "restores 10 HP!")
}

fn attack_mana(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_attack_chance, Reaction::Mana(REACTIVE_MANA), "restores 3 mana!")
}

fn evade_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::PoisonOpponent(REACTIVE_POISON), "applies poison on evade!")
}

fn evade_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::FrostOpponent(REACTIVE_FROST), "applies frost on evade!")
}

fn evade_mana(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::Mana(REACTIVE_MANA), "restores mana on evade!")
}

fn evade_heal(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::Heal(REACTIVE_HEAL), "restores HP on evade!")
}

fn evade_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::ShieldSelf(REACTIVE_SHIELD), "grants shield on evade!")
}

fn crit_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::PoisonOpponent(REACTIVE_POISON), "applies poison on crit!")
}

fn crit_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::FrostOpponent(REACTIVE_FROST), "applies frost on crit!")
}

fn crit_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::ShieldSelf(REACTIVE_SHIELD), "grants shield on crit!")
}

fn crit_heal(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::Heal(CRIT_HEAL), "restores HP on crit!")
}

fn crit_mana(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react(ctx, a, Reaction::Mana(REACTIVE_MANA), "restores mana on crit!")
}

fn heal_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_heal_chance, Reaction::PoisonOpponent(REACTIVE_POISON), "applies poison on heal!")
}

fn heal_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_heal_chance, Reaction::FrostOpponent(REACTIVE_FROST), "applies frost on heal!")
}

fn heal_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    react_with_chance(ctx, a, |c| c.on_heal_chance, Reaction::ShieldSelf(REACTIVE_SHIELD), "grants shield on heal!")
}

fn heal_damage(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    if ctx.env.roll(a.value / 100.0) {
        ctx.opponent.take_damage(HEAL_PROC_DAMAGE);
        ctx.announce(a, "deals 100 damage on heal!");
    }
    false
}

fn heal_threshold_damage(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    if let Trigger::HealThresholdCheck { heal_amount } = ctx.trigger {
        let threshold = ctx.env.constants.abilities.heal_threshold;
        let flags = &mut ctx.hero.battle_flags;
        flags.heal_threshold_progress += heal_amount.max(0.0);
        if flags.heal_threshold_progress >= threshold {
            flags.heal_threshold_progress -= threshold;
            ctx.opponent.take_damage(a.value);
            let text = format!("deals {} damage after healing {} HP!", fmt_amount(a.value), fmt_amount(threshold));
            ctx.announce(a, &text);
        }
    }
    false
}

// === Battle start ===

fn battle_start_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_opponent(StackKind::Poison, stacks(a.value));
    let text = format!("applies {} poison stacks at battle start!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

fn battle_start_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_opponent(StackKind::Frost, stacks(a.value));
    let text = format!("applies {} frost stacks at battle start!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

fn battle_start_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_self(StackKind::Shield, stacks(a.value));
    let text = format!("grants {} shield stacks at battle start!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

fn life_break(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let damage = (ctx.hero.current_health * a.value / 100.0).round();
    let floor = 1.0_f64.min(ctx.hero.current_health);
    ctx.hero.set_health((ctx.hero.current_health - damage).max(floor));
    ctx.opponent.take_damage(damage);
    let text = format!("deals {} damage to both heroes!", fmt_amount(damage));
    ctx.announce(a, &text);
    false
}

fn self_poison_reflect(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_self(StackKind::Poison, stacks(a.value));
    ctx.hero.battle_flags.self_poison_reflect = true;
    let text = format!("applies {} poison stacks to self!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

fn frostbite_stun(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.opponent.status_effects.push(StatusEffect::Stun {
        ticks_remaining: FROSTBITE_STUN_TICKS,
    });
    let until = ctx.env.now_ms + ctx.env.constants.timing.frostbite_duration_ms;
    let flags = &mut ctx.hero.battle_flags;
    flags.frostbite_until_ms = Some(until);
    flags.frostbite_damage = a.value;
    false
}

// === Ultimate follow-ups ===

fn ultimate_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_opponent(StackKind::Poison, stacks(a.value));
    let text = format!("applies {} poison stacks!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

fn ultimate_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_opponent(StackKind::Frost, stacks(a.value));
    let text = format!("applies {} frost stacks!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

fn ultimate_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_self(StackKind::Shield, stacks(a.value));
    let text = format!("grants {} shield stacks!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

fn ultimate_heal(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.hero.heal(a.value);
    let text = format!("restores {} HP!", fmt_amount(a.value));
    ctx.announce(a, &text);
    false
}

// === Periodic channels ===

fn poison_aura(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_opponent(StackKind::Poison, stacks(a.value));
    false
}

fn frost_aura(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_opponent(StackKind::Frost, stacks(a.value));
    false
}

fn shield_aura(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.stack_self(StackKind::Shield, stacks(a.value));
    false
}

fn health_regen_flat(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.regenerate(a.value);
    false
}

fn health_regen_percent(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let amount = (ctx.hero.max_health() * a.value / 100.0).round();
    ctx.regenerate(amount);
    false
}

fn enhanced_regen(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    ctx.regenerate(a.value);
    false
}

fn blood_strike(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let damage = (ctx.hero.max_health() * a.value / 100.0).round();
    ctx.opponent.take_damage(damage);
    let text = format!("deals {} damage!", fmt_amount(damage));
    ctx.announce(a, &text);
    false
}

fn hp_loss_stacks(ctx: &HookContext<'_, '_>, a: &AbilityDescriptor) -> u32 {
    let lost = ctx.hero.missing_health();
    ((lost * a.value / 100.0).floor().max(0.0) as u32).max(HP_LOSS_MIN_STACKS)
}

fn hp_loss_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let n = hp_loss_stacks(ctx, a);
    ctx.stack_opponent(StackKind::Poison, n);
    false
}

fn hp_loss_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let n = hp_loss_stacks(ctx, a);
    ctx.stack_opponent(StackKind::Frost, n);
    false
}

fn hp_loss_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let n = hp_loss_stacks(ctx, a);
    ctx.stack_self(StackKind::Shield, n);
    false
}

fn drums_of_slom(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let damage = (ctx.hero.max_health() * a.value / 100.0).round();
    ctx.opponent.take_damage(damage);
    ctx.hero.battle_flags.bonus_max_health += DRUMS_MAX_HP_GAIN;
    let text = format!("deals {} damage and increases max HP!", fmt_amount(damage));
    ctx.announce(a, &text);
    false
}

fn frost_nova(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let damage = a.value + ctx.opponent.status_effects.stacks(StackKind::Frost) as f64;
    ctx.opponent.take_damage(damage);
    let text = format!("deals {} damage!", fmt_amount(damage));
    ctx.announce(a, &text);
    false
}

fn shield_loss_damage(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let lost = ctx.hero.battle_flags.shield_lost_this_period;
    let damage = (lost * a.value / 100.0).round();
    let refund = (lost * SHIELD_LOSS_REFUND).round();
    if damage > 0.0 {
        ctx.opponent.take_damage(damage);
        ctx.stack_self(StackKind::Shield, stacks(refund));
        let text = format!("deals {} damage and grants {} shield!", fmt_amount(damage), fmt_amount(refund));
        ctx.announce(a, &text);
    }
    false
}

// === Damage reactions ===

fn damage_taken_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let chance = a.value / 100.0;
    if ctx.env.roll(chance) {
        react(ctx, a, Reaction::PoisonOpponent(DAMAGE_TAKEN_POISON), "applies poison when taking damage!");
    }
    false
}

fn damage_taken_frost(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let chance = a.value / 100.0;
    if ctx.env.roll(chance) {
        react(ctx, a, Reaction::FrostOpponent(DAMAGE_TAKEN_FROST), "applies frost when taking damage!");
    }
    false
}

fn damage_dealt_poison(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let chance = a.value / 100.0;
    if ctx.env.roll(chance) {
        react(ctx, a, Reaction::PoisonOpponent(DAMAGE_TAKEN_POISON), "applies poison when dealing damage!");
    }
    false
}

fn high_damage_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    if let Trigger::HighDamageTaken { damage } = ctx.trigger {
        if damage > ctx.env.constants.damage.high_damage_threshold {
            ctx.stack_self(StackKind::Shield, stacks(a.value));
            let text = format!("grants {} shield stacks from high damage!", fmt_amount(a.value));
            ctx.announce(a, &text);
        }
    }
    false
}

// === Low health ===

fn low_hp_heal_double(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let tuning = &ctx.env.constants.abilities;
    let (below, window_ms) = (tuning.low_hp_heal_double_below, tuning.heal_double_window_ms);
    if ctx.hero.health_fraction() < below && ctx.hero.battle_flags.low_hp_heal_double_since_ms.is_none() {
        ctx.hero.battle_flags.low_hp_heal_double_since_ms = Some(ctx.env.now_ms);
        let text = format!("activates - healing doubled for {} seconds!", fmt_amount(window_ms as f64 / 1000.0));
        ctx.announce(a, &text);
    }
    false
}

fn low_hp_poison_burst(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let below = ctx.env.constants.abilities.low_hp_poison_below;
    if ctx.hero.health_fraction() < below && !ctx.hero.battle_flags.low_hp_poison_burst_used {
        ctx.hero.battle_flags.low_hp_poison_burst_used = true;
        ctx.stack_opponent(StackKind::Poison, stacks(a.value));
        let text = format!("applies {} poison stacks at low HP!", fmt_amount(a.value));
        ctx.announce(a, &text);
    }
    false
}

fn cold_embrace(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    let below = ctx.env.constants.abilities.cold_embrace_below;
    if ctx.hero.health_fraction() < below && ctx.hero.battle_flags.cold_embrace_since_ms.is_none() {
        ctx.hero.battle_flags.cold_embrace_since_ms = Some(ctx.env.now_ms);
        ctx.announce(a, "activates - massive damage reduction and healing!");
    }
    false
}

fn death_immunity_shield(ctx: &mut HookContext<'_, '_>, a: &AbilityDescriptor) -> bool {
    if ctx.hero.battle_flags.death_immunity_used {
        return false;
    }
    ctx.hero.battle_flags.death_immunity_used = true;
    ctx.hero.set_health(1.0);
    ctx.stack_self(StackKind::Shield, stacks(a.value));
    ctx.announce(a, "activates - immune to death with massive shield!");
    true
}

/// Built-in hooks, in no particular order
const DEFAULT_HOOKS: &[(TriggerKind, &str, HookFn)] = &[
    // === On attack ===
    (TriggerKind::OnAttack, "attack_poison", attack_poison),
    (TriggerKind::OnAttack, "attack_frost", attack_frost),
    (TriggerKind::OnAttack, "attack_shield", attack_shield),
    (TriggerKind::OnAttack, "attack_heal_chance", attack_heal),
    (TriggerKind::OnAttack, "attack_mana_restore", attack_mana),
    // === On evade ===
    (TriggerKind::OnEvade, "evade_poison", evade_poison),
    (TriggerKind::OnEvade, "evade_frost", evade_frost),
    (TriggerKind::OnEvade, "evade_mana", evade_mana),
    (TriggerKind::OnEvade, "evade_heal", evade_heal),
    (TriggerKind::OnEvade, "evade_shield", evade_shield),
    // === On crit ===
    (TriggerKind::OnCrit, "crit_poison", crit_poison),
    (TriggerKind::OnCrit, "crit_frost", crit_frost),
    (TriggerKind::OnCrit, "crit_shield", crit_shield),
    (TriggerKind::OnCrit, "crit_heal", crit_heal),
    (TriggerKind::OnCrit, "crit_mana", crit_mana),
    // === On heal ===
    (TriggerKind::OnHeal, "heal_poison_chance", heal_poison),
    (TriggerKind::OnHeal, "heal_frost_chance", heal_frost),
    (TriggerKind::OnHeal, "heal_shield_chance", heal_shield),
    (TriggerKind::OnHeal, "heal_damage_chance", heal_damage),
    (TriggerKind::HealThresholdCheck, "heal_threshold_damage", heal_threshold_damage),
    // === Battle start ===
    (TriggerKind::BattleStart, "battle_start_poison", battle_start_poison),
    (TriggerKind::BattleStart, "battle_start_frost", battle_start_frost),
    (TriggerKind::BattleStart, "battle_start_shield", battle_start_shield),
    (TriggerKind::BattleStart, "life_break", life_break),
    (TriggerKind::BattleStart, "self_poison_reflect", self_poison_reflect),
    (TriggerKind::BattleStart, "frostbite_stun", frostbite_stun),
    // === On ultimate ===
    (TriggerKind::OnUltimate, "ultimate_poison", ultimate_poison),
    (TriggerKind::OnUltimate, "ultimate_frost", ultimate_frost),
    (TriggerKind::OnUltimate, "ultimate_shield", ultimate_shield),
    (TriggerKind::OnUltimate, "ultimate_heal", ultimate_heal),
    // === Periodic ===
    (TriggerKind::StatusTick, "poison_aura", poison_aura),
    (TriggerKind::StatusTick, "frost_aura", frost_aura),
    (TriggerKind::StatusTick, "shield_aura", shield_aura),
    (TriggerKind::StatusTick, "health_regen_flat", health_regen_flat),
    (TriggerKind::StatusTick, "health_regen_percent", health_regen_percent),
    (TriggerKind::EnhancedTick, "enhanced_regen", enhanced_regen),
    (TriggerKind::EnhancedTick, "blood_strike", blood_strike),
    (TriggerKind::HpLossTick, "hp_loss_poison", hp_loss_poison),
    (TriggerKind::HpLossTick, "hp_loss_frost", hp_loss_frost),
    (TriggerKind::HpLossTick, "hp_loss_shield", hp_loss_shield),
    (TriggerKind::DrumsTick, "drums_of_slom", drums_of_slom),
    (TriggerKind::FrostNovaTick, "frost_nova_damage", frost_nova),
    (TriggerKind::ShieldLossTick, "shield_loss_damage", shield_loss_damage),
    // === Damage reactions ===
    (TriggerKind::OnDamageTaken, "damage_poison_chance", damage_taken_poison),
    (TriggerKind::OnDamageTaken, "damage_frost_chance", damage_taken_frost),
    (TriggerKind::OnDamageDealt, "deal_damage_poison_chance", damage_dealt_poison),
    (TriggerKind::HighDamageTaken, "high_damage_shield", high_damage_shield),
    // === Low health ===
    (TriggerKind::LowHpCheck, "low_hp_heal_double", low_hp_heal_double),
    (TriggerKind::LowHpCheck, "low_hp_poison_burst", low_hp_poison_burst),
    (TriggerKind::LowHpCheck, "cold_embrace_defense", cold_embrace),
    (TriggerKind::DeathSave, "death_immunity_shield", death_immunity_shield),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::BattleLog;
    use crate::config::CombatConstants;
    use crate::hero::{BaseStats, HeroTemplate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hero(name: &str) -> Hero {
        Hero::from_template(&HeroTemplate::new(name, name, BaseStats::new(1000.0, 50.0, 0.0, 1.0)))
    }

    fn fire(hook: HookFn, trigger: Trigger, ability: &AbilityDescriptor, hero: &mut Hero, opponent: &mut Hero) -> (bool, BattleLog) {
        fire_with(&CombatConstants::default(), hook, trigger, ability, hero, opponent)
    }

    fn fire_with(
        constants: &CombatConstants,
        hook: HookFn,
        trigger: Trigger,
        ability: &AbilityDescriptor,
        hero: &mut Hero,
        opponent: &mut Hero,
    ) -> (bool, BattleLog) {
        let mut log = BattleLog::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut env = CombatEnv::new(&mut log, &mut rng, constants).with_now(1000);
        let consumed = {
            let mut ctx = HookContext {
                env: &mut env,
                hero,
                opponent,
                trigger,
            };
            hook(&mut ctx, ability)
        };
        (consumed, log)
    }

    #[test]
    fn test_default_keys_are_unique_per_channel() {
        let registry = HookRegistry::with_defaults();
        assert_eq!(registry.len(), DEFAULT_HOOKS.len());
        assert!(registry.get(TriggerKind::OnAttack, "attack_poison").is_some());
        assert!(registry.get(TriggerKind::OnCrit, "attack_poison").is_none());
    }

    #[test]
    fn test_on_attack_chance_comes_from_constants() {
        let ability = AbilityDescriptor::new("Venom Strike", "attack_poison", 1.0);
        let mut constants = CombatConstants::default();

        constants.abilities.on_attack_chance = 0.0;
        let (mut owner, mut victim) = (hero("Owner"), hero("Victim"));
        for _ in 0..20 {
            fire_with(&constants, attack_poison, Trigger::OnAttack, &ability, &mut owner, &mut victim);
        }
        assert_eq!(victim.status_effects.stacks(StackKind::Poison), 0);

        constants.abilities.on_attack_chance = 1.0;
        let (_, log) = fire_with(&constants, attack_poison, Trigger::OnAttack, &ability, &mut owner, &mut victim);
        assert!(victim.status_effects.stacks(StackKind::Poison) > 0);
        assert!(log.contains("applies poison!"));
    }

    #[test]
    fn test_extra_stacks_are_added_by_owner() {
        let mut owner = hero("Owner");
        owner.effective_stats.extra_poison_stacks = 2.0;
        let mut victim = hero("Victim");
        let ability = AbilityDescriptor::new("Venom Start", "battle_start_poison", 10.0);

        let (_, log) = fire(battle_start_poison, Trigger::BattleStart, &ability, &mut owner, &mut victim);
        assert_eq!(victim.status_effects.stacks(StackKind::Poison), 12);
        assert_eq!(log.last(), Some("Owner's Venom Start applies 10 poison stacks at battle start!"));
    }

    #[test]
    fn test_hp_loss_stacks_have_a_floor() {
        let mut owner = hero("Owner");
        let mut victim = hero("Victim");
        let ability = AbilityDescriptor::new("Spite", "hp_loss_poison", 10.0);

        fire(hp_loss_poison, Trigger::HpLossTick, &ability, &mut owner, &mut victim);
        assert_eq!(victim.status_effects.stacks(StackKind::Poison), 3);

        owner.take_damage(500.0);
        fire(hp_loss_poison, Trigger::HpLossTick, &ability, &mut owner, &mut victim);
        assert_eq!(victim.status_effects.stacks(StackKind::Poison), 53);
    }

    #[test]
    fn test_heal_threshold_reads_payload() {
        let mut owner = hero("Owner");
        let mut victim = hero("Victim");
        let ability = AbilityDescriptor::new("Radiance", "heal_threshold_damage", 75.0);

        fire(heal_threshold_damage, Trigger::HealThresholdCheck { heal_amount: 300.0 }, &ability, &mut owner, &mut victim);
        assert!((victim.current_health - 1000.0).abs() < f64::EPSILON);

        let (_, log) = fire(heal_threshold_damage, Trigger::HealThresholdCheck { heal_amount: 300.0 }, &ability, &mut owner, &mut victim);
        assert!((victim.current_health - 925.0).abs() < f64::EPSILON);
        assert!((owner.battle_flags.heal_threshold_progress - 200.0).abs() < f64::EPSILON);
        assert!(log.contains("after healing 400 HP"));
    }

    #[test]
    fn test_high_damage_shield_needs_damage_over_threshold() {
        let mut owner = hero("Owner");
        let mut victim = hero("Victim");
        let ability = AbilityDescriptor::new("Bulwark", "high_damage_shield", 30.0);

        fire(high_damage_shield, Trigger::HighDamageTaken { damage: 60.0 }, &ability, &mut owner, &mut victim);
        assert_eq!(owner.status_effects.stacks(StackKind::Shield), 0);

        fire(high_damage_shield, Trigger::HighDamageTaken { damage: 120.0 }, &ability, &mut owner, &mut victim);
        assert_eq!(owner.status_effects.stacks(StackKind::Shield), 30);
    }

    #[test]
    fn test_death_immunity_fires_once() {
        let mut owner = hero("Owner");
        let mut victim = hero("Victim");
        let ability = AbilityDescriptor::new("Final Stand", "death_immunity_shield", 200.0);
        owner.take_damage(990.0);

        let (saved, _) = fire(death_immunity_shield, Trigger::DeathSave, &ability, &mut owner, &mut victim);
        assert!(saved);
        assert!((owner.current_health - 1.0).abs() < f64::EPSILON);
        assert_eq!(owner.status_effects.stacks(StackKind::Shield), 200);

        let (saved_again, _) = fire(death_immunity_shield, Trigger::DeathSave, &ability, &mut owner, &mut victim);
        assert!(!saved_again);
    }

    #[test]
    fn test_life_break_never_kills_owner() {
        let mut owner = hero("Owner");
        let mut victim = hero("Victim");
        let ability = AbilityDescriptor::new("Life Break", "life_break", 100.0);

        let (_, log) = fire(life_break, Trigger::BattleStart, &ability, &mut owner, &mut victim);
        assert!((owner.current_health - 1.0).abs() < f64::EPSILON);
        assert!((victim.current_health - 0.0).abs() < f64::EPSILON);
        assert_eq!(log.last(), Some("Owner's Life Break deals 1000 damage to both heroes!"));
    }

    #[test]
    fn test_regen_is_cut_by_enemy_reduction() {
        let mut owner = hero("Owner");
        owner.take_damage(500.0);
        let mut victim = hero("Victim");
        victim.effective_stats.derived.insert("enemyRegenReductionPct".to_string(), 20.0);
        let ability = AbilityDescriptor::new("Regrowth", "health_regen_flat", 50.0);

        fire(health_regen_flat, Trigger::StatusTick, &ability, &mut owner, &mut victim);
        assert!((owner.current_health - 540.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_drums_raise_max_health() {
        let mut owner = hero("Owner");
        let mut victim = hero("Victim");
        let ability = AbilityDescriptor::new("Drums of Slom", "drums_of_slom", 5.0);

        fire(drums_of_slom, Trigger::DrumsTick, &ability, &mut owner, &mut victim);
        assert!((victim.current_health - 950.0).abs() < f64::EPSILON);
        assert!((owner.max_health() - 1200.0).abs() < f64::EPSILON);
    }
}
