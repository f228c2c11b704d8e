//! Battle - two heroes, one log, and every per-tick combat rule
//!
//! A [`Battle`] owns all mutable state of one fight. It has no notion of
//! time beyond what its driver tells it: each `*_tick` method is one firing
//! of the matching game loop channel.

use crate::abilities::{AbilitySystem, Trigger};
use crate::calculator::StatsCalculator;
use crate::combat::{calculate_damage, fmt_amount, BattleError, BattleLog, BattleResult, BattleSnapshot, CombatEnv, CombatantSnapshot};
use crate::config::CombatConstants;
use crate::effects::EffectRegistry;
use crate::hero::Hero;
use crate::types::{BattleOutcome, DamageType, Side};
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

/// State of one battle between the player and an enemy
#[derive(Debug)]
pub struct Battle {
    /// Indexed by [`Side`]: player first
    heroes: [Hero; 2],
    log: BattleLog,
    rng: StdRng,
    constants: CombatConstants,
    calculator: StatsCalculator,
    abilities: AbilitySystem,

    // === Progress ===
    game_over: bool,
    outcome: Option<BattleOutcome>,
    damage_multiplier: f64,
    speed_multiplier: f64,
    /// Milliseconds accumulated towards each side's next attack
    accumulators: [f64; 2],
    elapsed_ms: u64,
    refresh_pending: bool,
}

impl Battle {
    /// Prepare both heroes for a fresh battle
    ///
    /// Each hero gets effective stats, full health and empty mana.
    pub fn new(player: Hero, enemy: Hero, constants: CombatConstants, rng: StdRng) -> Self {
        let calculator = StatsCalculator::new(EffectRegistry::with_defaults(), &constants);
        let mut battle = Battle {
            heroes: [player, enemy],
            log: BattleLog::new(),
            rng,
            calculator,
            abilities: AbilitySystem::default(),
            constants,
            game_over: false,
            outcome: None,
            damage_multiplier: 1.0,
            speed_multiplier: 1.0,
            accumulators: [0.0; 2],
            elapsed_ms: 0,
            refresh_pending: false,
        };
        for side in Side::both() {
            battle.prepare(side);
        }
        battle
    }

    /// Replace the ability system (custom hook registries)
    pub fn with_abilities(mut self, abilities: AbilitySystem) -> Self {
        self.abilities = abilities;
        self
    }

    fn prepare(&mut self, side: Side) {
        let max_mana = self.constants.mana.max_mana;
        let hero = &mut self.heroes[side.index()];
        hero.reset_for_battle(max_mana);
        hero.refresh_item_behaviours();
        hero.effective_stats = self.calculator.compute_stats(hero);
        hero.current_health = hero.max_health();
    }

    /// Borrow the rule environment plus `side`'s hero and its opponent
    fn split(&mut self, side: Side) -> (CombatEnv<'_>, &mut Hero, &mut Hero, &AbilitySystem) {
        let Battle {
            heroes,
            log,
            rng,
            constants,
            abilities,
            damage_multiplier,
            elapsed_ms,
            ..
        } = self;
        let [player, enemy] = heroes;
        let (hero, opponent) = match side {
            Side::Player => (player, enemy),
            Side::Enemy => (enemy, player),
        };
        let env = CombatEnv::new(log, rng, &*constants)
            .with_damage_multiplier(*damage_multiplier)
            .with_now(*elapsed_ms);
        (env, hero, opponent, &*abilities)
    }

    /// Fire one trigger channel for `side`'s hero
    fn fire(&mut self, side: Side, trigger: Trigger) -> bool {
        let (mut env, hero, opponent, abilities) = self.split(side);
        abilities.trigger_abilities(&mut env, hero, opponent, trigger)
    }

    // === Lifecycle ===

    /// Start the fight: battle-start hooks, then the opening narration
    pub fn begin(&mut self) {
        self.accumulators = [0.0; 2];
        for side in Side::both() {
            self.heroes[side.index()].current_mana = 0.0;
        }
        for side in Side::both() {
            self.fire(side, Trigger::BattleStart);
        }

        let [player, enemy] = &self.heroes;
        let (p_speed, e_speed) = (player.effective_stats.speed, enemy.effective_stats.speed);
        let opening = [
            format!("{} ({} SPD) vs {} ({} SPD)", player.name, p_speed.round(), enemy.name, e_speed.round()),
            "Battle begins! Both heroes attack simultaneously based on their speed.".to_string(),
            format!("{} attacks {:.2} times/sec | {} attacks {:.2} times/sec", player.name, p_speed, enemy.name, e_speed),
        ];
        info!(
            player = %player.name,
            enemy = %enemy.name,
            player_interval_ms = self.attack_interval_ms(Side::Player),
            enemy_interval_ms = self.attack_interval_ms(Side::Enemy),
            "battle started"
        );
        for line in opening {
            self.log.push(line);
        }

        self.check_deaths();
    }

    /// End the battle once; later calls do nothing and return false
    pub fn end_battle(&mut self, outcome: BattleOutcome) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        self.outcome = Some(outcome);

        let line = match outcome {
            BattleOutcome::Victory => format!("🎉 Victory! {} wins the battle!", self.player().name),
            BattleOutcome::Defeat => format!("💀 Defeat! {} wins the battle!", self.enemy().name),
        };
        self.log.push(line);
        info!(outcome = %outcome, elapsed_ms = self.elapsed_ms, "battle ended");
        true
    }

    /// End the battle if either hero is down; the player's death is checked first
    pub fn check_deaths(&mut self) -> bool {
        if self.game_over {
            return true;
        }
        if !self.player().is_alive() {
            self.end_battle(BattleOutcome::Defeat)
        } else if !self.enemy().is_alive() {
            self.end_battle(BattleOutcome::Victory)
        } else {
            false
        }
    }

    // === Attacks ===

    /// Milliseconds between `side`'s attacks at its current speed
    ///
    /// Speed below the configured minimum (including zero or negative
    /// values set directly on the stats) attacks at the minimum speed.
    pub fn attack_interval_ms(&self, side: Side) -> f64 {
        let min_speed = self.constants.diminishing_returns.min_speed;
        let speed = self.hero(side).effective_stats.speed;
        let speed = if speed.is_finite() { speed.max(min_speed) } else { min_speed };
        (1000.0 / speed / self.speed_multiplier).max(self.constants.timing.attack_interval_floor_ms)
    }

    /// Advance `side`'s attack accumulator by one loop tick, attacking when it is full
    ///
    /// The accumulator resets to zero after an attack; leftover time is dropped.
    pub fn attack_tick(&mut self, side: Side) {
        if self.game_over {
            return;
        }
        let i = side.index();
        self.accumulators[i] += self.constants.timing.tick_rate_ms as f64;
        if self.accumulators[i] >= self.attack_interval_ms(side) {
            self.accumulators[i] = 0.0;
            self.execute_attack(side);
        }
    }

    /// Resolve one attack by `side` against its opponent
    ///
    /// Faults inside the attack are written to the battle log and do not
    /// end the battle.
    pub fn execute_attack(&mut self, side: Side) {
        if self.game_over {
            return;
        }
        if let Err(err) = self.try_attack(side) {
            warn!(attacker = %self.hero(side).name, error = %err, "attack failed");
            self.log.push(format!("⚠️ Error during attack: {}", err));
        }

        if !self.hero(side.opponent()).is_alive() {
            let outcome = match side {
                Side::Player => BattleOutcome::Victory,
                Side::Enemy => BattleOutcome::Defeat,
            };
            self.end_battle(outcome);
        } else {
            self.check_deaths();
        }
    }

    fn try_attack(&mut self, side: Side) -> BattleResult<()> {
        let (mut env, attacker, target, abilities) = self.split(side);

        abilities.trigger_abilities(&mut env, attacker, target, Trigger::OnAttack);
        let passive = abilities.process_passive_ability(&mut env, attacker);

        if attacker.has_full_mana() {
            let name = attacker
                .abilities
                .ultimate
                .as_ref()
                .map(|u| u.name.clone())
                .ok_or_else(|| BattleError::MissingUltimate {
                    hero: attacker.name.clone(),
                })?;
            let outcome = abilities.execute_ability(&mut env, attacker, target, &name);
            attacker.current_mana = 0.0;
            abilities.trigger_abilities(&mut env, attacker, target, Trigger::OnUltimate);
            abilities.trigger_abilities(&mut env, target, attacker, Trigger::OnEnemyUltimate);
            debug!(attacker = %attacker.name, ultimate = %name, damage = outcome.damage, effects = ?outcome.effects, "ultimate cast");

            if !target.is_alive() && survives_lethal(&mut env, abilities, target, attacker) {
                target.set_health(target.current_health.max(1.0));
                return Ok(());
            }
            after_hit(&mut env, abilities, attacker, target, outcome.damage, false);
            return Ok(());
        }

        let mut damage = calculate_damage(&mut env, attacker.effective_stats.attack, target, DamageType::Physical, Some(&*attacker));

        // first matching evasion source wins
        let mut evaded = false;
        if attacker.equipment_state.take_force_no_evasion() {
            // unavoidable
        } else if target.equipment_state.take_auto_evade() {
            evaded = true;
            damage = evade(damage, target);
            env.log(format!("{} evades with equipment, reducing damage to {}!", target.name, fmt_amount(damage)));
        } else if aura_roll(&mut env, target) {
            evaded = true;
            damage = evade(damage, target);
            env.log(format!("{}'s attack misses due to aura!", attacker.name));
        } else if env.roll(target.effective_stats.evasion_chance) {
            evaded = true;
            damage = evade(damage, target);
            env.log(format!("{} partially evades, reducing damage to {}!", target.name, fmt_amount(damage)));
        }
        if evaded {
            abilities.trigger_abilities(&mut env, target, attacker, Trigger::OnEvade);
        }

        let mut crit_chance = attacker.effective_stats.crit_chance;
        if passive.critical_hit {
            crit_chance += env.constants.crit.passive_bonus;
        }
        if attacker.equipment_state.take_force_crit() {
            crit_chance = 1.0;
        }
        let was_crit = env.roll(crit_chance);
        if was_crit {
            let multiplier = match attacker.effective_stats.crit_damage {
                m if m > 0.0 => m,
                _ => env.constants.crit.base_multiplier,
            };
            damage = (damage * multiplier).round();
            env.log(format!("{} attacks with a critical hit for {} damage!", attacker.name, fmt_amount(damage)));
            abilities.trigger_abilities(&mut env, attacker, target, Trigger::OnCrit);
        } else {
            env.log(format!("{} attacks for {} damage!", attacker.name, fmt_amount(damage)));
        }

        let bonus = attacker.equipment_state.take_on_hit_bonus_magic();
        if bonus > 0.0 {
            let bonus_damage = calculate_damage(&mut env, bonus, target, DamageType::Magic, None);
            target.take_damage(bonus_damage);
            env.log(format!("{}'s equipment deals {} bonus magic damage!", attacker.name, fmt_amount(bonus_damage)));
        }

        debug!(
            attacker = %attacker.name,
            target = %target.name,
            damage,
            evaded,
            crit = was_crit,
            "attack resolved"
        );

        if target.current_health - damage <= 0.0 && survives_lethal(&mut env, abilities, target, attacker) {
            return Ok(());
        }

        let flat = target.equipment_state.take_reduce_incoming_flat();
        if flat > 0.0 {
            damage = (damage - flat).max(0.0);
        }
        target.take_damage(damage);
        after_hit(&mut env, abilities, attacker, target, damage, was_crit);
        Ok(())
    }

    // === Periodic channels ===

    /// Regenerate `side`'s mana for one mana interval
    pub fn mana_tick(&mut self, side: Side) {
        if self.game_over {
            return;
        }
        let now = self.elapsed_ms;
        let seconds = self.constants.timing.mana_interval_ms as f64 / 1000.0;
        let base = self.constants.mana.base_regen_per_sec;

        let hero = &mut self.heroes[side.index()];
        hero.equipment_state.prune_expired(now);
        if hero.has_full_mana() {
            return;
        }
        let per_sec = (base + hero.effective_stats.mana_regeneration + hero.equipment_state.mana_regen_delta(now)).max(0.0);
        let gained = (per_sec * seconds).ceil();
        hero.restore_mana(gained);
        trace!(hero = %hero.name, gained, mana = hero.current_mana, "mana tick");
    }

    /// Status effects for both sides, then status and low-HP hooks
    pub fn status_tick(&mut self) {
        if self.game_over {
            return;
        }
        for side in Side::both() {
            let (mut env, hero, opponent, abilities) = self.split(side);
            abilities.process_status_effects(&mut env, hero, opponent);
        }
        for side in Side::both() {
            self.fire(side, Trigger::StatusTick);
        }
        for side in Side::both() {
            self.fire(side, Trigger::LowHpCheck);
        }
        self.check_deaths();
    }

    /// Fire a periodic trigger channel for both sides, player first
    pub fn channel_tick(&mut self, trigger: Trigger) {
        if self.game_over {
            return;
        }
        for side in Side::both() {
            self.fire(side, trigger);
        }
        self.check_deaths();
    }

    /// Shield-loss hooks, then start a new shield-loss period
    pub fn shield_loss_tick(&mut self) {
        self.channel_tick(Trigger::ShieldLossTick);
        for hero in self.heroes.iter_mut() {
            hero.battle_flags.shield_lost_this_period = 0.0;
        }
    }

    /// Pulse active frostbite windows
    pub fn frostbite_tick(&mut self) {
        if self.game_over {
            return;
        }
        for side in Side::both() {
            let (mut env, hero, opponent, abilities) = self.split(side);
            abilities.process_frostbite(&mut env, hero, opponent);
        }
        self.check_deaths();
    }

    /// Equipment clocks and thresholds
    pub fn equipment_tick(&mut self) {
        self.channel_tick(Trigger::EquipmentTick);
    }

    /// Recompute effective stats for both sides and flag a redraw
    pub fn refresh_tick(&mut self) {
        if self.game_over {
            return;
        }
        for side in Side::both() {
            self.refresh_stats(side);
        }
        self.refresh_pending = true;
        trace!(elapsed_ms = self.elapsed_ms, "stats refreshed");
    }

    /// Recompute `side`'s effective stats, keeping health within the new cap
    pub fn refresh_stats(&mut self, side: Side) {
        let hero = &mut self.heroes[side.index()];
        hero.effective_stats = self.calculator.compute_stats(hero);
        let cap = hero.max_health();
        if hero.current_health > cap {
            hero.current_health = cap;
        }
    }

    // === Accessors ===

    pub fn hero(&self, side: Side) -> &Hero {
        &self.heroes[side.index()]
    }

    pub fn hero_mut(&mut self, side: Side) -> &mut Hero {
        &mut self.heroes[side.index()]
    }

    pub fn player(&self) -> &Hero {
        self.hero(Side::Player)
    }

    pub fn enemy(&self) -> &Hero {
        self.hero(Side::Enemy)
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    pub fn calculator(&self) -> &StatsCalculator {
        &self.calculator
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Set the battle clock; driven by the game loop's tick count
    pub fn set_elapsed(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }

    pub fn damage_multiplier(&self) -> f64 {
        self.damage_multiplier
    }

    pub fn set_damage_multiplier(&mut self, multiplier: f64) {
        self.damage_multiplier = multiplier;
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.speed_multiplier = multiplier;
    }

    /// Read and clear the redraw flag set by [`Battle::refresh_tick`]
    pub fn take_refresh(&mut self) -> bool {
        std::mem::take(&mut self.refresh_pending)
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            player: CombatantSnapshot::of(self.player()),
            enemy: CombatantSnapshot::of(self.enemy()),
            game_over: self.game_over,
            outcome: self.outcome,
            elapsed_ms: self.elapsed_ms,
            damage_multiplier: self.damage_multiplier,
            log_len: self.log.len(),
        }
    }
}

// === Attack helpers ===

/// Damage left after an evasion, scaled by the target's evasion damage reduction
fn evade(damage: f64, target: &Hero) -> f64 {
    (damage * (1.0 - target.effective_stats.evasion_damage_reduction)).round()
}

/// Roll the target's miss-chance aura; never rolls without an aura
fn aura_roll(env: &mut CombatEnv<'_>, target: &Hero) -> bool {
    let chance = target.equipment_state.enemy_miss_chance_bonus_pct / 100.0;
    chance > 0.0 && env.roll(chance)
}

/// Give `target` a chance to avoid a lethal hit; true when death is averted
fn survives_lethal(env: &mut CombatEnv<'_>, abilities: &AbilitySystem, target: &mut Hero, attacker: &mut Hero) -> bool {
    if target.consume_death_save() {
        target.set_health(1.0);
        env.log(format!("{} survives fatal damage!", target.name));
        return true;
    }
    abilities.trigger_abilities(env, target, attacker, Trigger::DeathSave)
}

/// Damage-taken, damage-dealt and high-damage hooks for a committed hit
fn after_hit(env: &mut CombatEnv<'_>, abilities: &AbilitySystem, attacker: &mut Hero, target: &mut Hero, damage: f64, was_crit: bool) {
    if damage <= 0.0 {
        return;
    }
    abilities.trigger_abilities(
        env,
        target,
        attacker,
        Trigger::OnDamageTaken {
            was_crit,
            damage_type: DamageType::Physical,
        },
    );
    abilities.trigger_abilities(env, attacker, target, Trigger::OnDamageDealt);
    if damage > env.constants.damage.high_damage_threshold {
        abilities.trigger_abilities(env, target, attacker, Trigger::HighDamageTaken { damage });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::{AbilityDescriptor, BaseStats, HeroTemplate};
    use crate::status::StackKind;
    use rand::SeedableRng;

    fn hero(name: &str, health: f64, attack: f64) -> Hero {
        let template = HeroTemplate::new(name, name, BaseStats::new(health, attack, 0.0, 1.0)).with_ultimate("Fireball");
        Hero::from_template(&template)
    }

    fn battle(player: Hero, enemy: Hero) -> Battle {
        Battle::new(player, enemy, CombatConstants::default(), StdRng::seed_from_u64(11))
    }

    #[test]
    fn test_new_prepares_both_heroes() {
        let mut player = hero("Knight", 500.0, 40.0);
        player.current_health = 12.0;
        player.current_mana = 80.0;
        let battle = battle(player, hero("Orc", 600.0, 30.0));

        assert!((battle.player().current_health - 500.0).abs() < f64::EPSILON);
        assert!((battle.player().current_mana - 0.0).abs() < f64::EPSILON);
        assert!((battle.enemy().max_mana - 100.0).abs() < f64::EPSILON);
        assert!(!battle.is_game_over());
    }

    #[test]
    fn test_begin_writes_opening_lines() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle.begin();
        assert_eq!(
            battle.log().entries(),
            &[
                "Knight (1 SPD) vs Orc (1 SPD)".to_string(),
                "Battle begins! Both heroes attack simultaneously based on their speed.".to_string(),
                "Knight attacks 1.00 times/sec | Orc attacks 1.00 times/sec".to_string(),
            ]
        );
    }

    #[test]
    fn test_shield_absorbs_whole_hit() {
        let mut battle = battle(hero("Knight", 500.0, 30.0), hero("Orc", 600.0, 30.0));
        battle.hero_mut(Side::Enemy).status_effects.add_stacks(StackKind::Shield, 50);

        battle.execute_attack(Side::Player);
        let orc = battle.enemy();
        assert!((orc.current_health - 600.0).abs() < f64::EPSILON);
        assert_eq!(orc.status_effects.stacks(StackKind::Shield), 14);
        assert!(battle.log().contains("Shield absorbs 30 damage!"));
    }

    #[test]
    fn test_death_save_consumed_once() {
        let mut battle = battle(hero("Knight", 500.0, 100.0), hero("Orc", 50.0, 30.0));
        battle.hero_mut(Side::Enemy).effective_stats.death_save_charges = 1.0;

        battle.execute_attack(Side::Player);
        assert!((battle.enemy().current_health - 1.0).abs() < f64::EPSILON);
        assert_eq!(battle.enemy().effective_stats.death_saves(), 0);
        assert!(battle.log().contains("Orc survives fatal damage!"));
        assert!(!battle.is_game_over());

        battle.execute_attack(Side::Player);
        assert!(!battle.enemy().is_alive());
        assert_eq!(battle.outcome(), Some(BattleOutcome::Victory));
    }

    #[test]
    fn test_death_save_survives_stat_refresh() {
        let player = hero("Knight", 500.0, 100.0).with_ability(AbilityDescriptor::new("Last Breath", "death_save", 1.0));
        let mut battle = battle(player, hero("Orc", 600.0, 30.0));
        assert_eq!(battle.player().effective_stats.death_saves(), 1);

        assert!(battle.hero_mut(Side::Player).consume_death_save());
        battle.refresh_stats(Side::Player);
        assert_eq!(battle.player().effective_stats.death_saves(), 0);
    }

    #[test]
    fn test_force_no_evasion_beats_auto_evade() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle.hero_mut(Side::Player).equipment_state.force_no_evasion = true;
        battle.hero_mut(Side::Enemy).equipment_state.auto_evade_ready = true;
        battle.hero_mut(Side::Enemy).effective_stats.evasion_damage_reduction = 1.0;

        battle.execute_attack(Side::Player);
        assert!(!battle.player().equipment_state.force_no_evasion);
        assert!(battle.enemy().equipment_state.auto_evade_ready);
        assert!(!battle.log().contains("evades"));
        assert!(battle.enemy().current_health < 600.0);
    }

    #[test]
    fn test_auto_evade_is_consumed() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle.hero_mut(Side::Enemy).equipment_state.auto_evade_ready = true;
        battle.hero_mut(Side::Enemy).effective_stats.evasion_damage_reduction = 0.5;

        battle.execute_attack(Side::Player);
        assert!(!battle.enemy().equipment_state.auto_evade_ready);
        assert!(battle.log().contains("Orc evades with equipment, reducing damage to 20!"));
    }

    #[test]
    fn test_ultimate_only_with_full_mana() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle.hero_mut(Side::Player).current_mana = 99.0;
        battle.execute_attack(Side::Player);
        assert!(!battle.log().contains("Fireball"));

        battle.hero_mut(Side::Player).current_mana = 100.0;
        battle.execute_attack(Side::Player);
        assert!(battle.log().contains("Fireball"));
        assert!((battle.player().current_mana - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_ultimate_is_contained() {
        let template = HeroTemplate::new("plain", "Plain", BaseStats::new(500.0, 40.0, 0.0, 1.0));
        let mut battle = battle(Hero::from_template(&template), hero("Orc", 600.0, 30.0));
        battle.hero_mut(Side::Player).current_mana = 100.0;

        battle.execute_attack(Side::Player);
        assert_eq!(battle.log().last(), Some("⚠️ Error during attack: Plain has no ultimate ability"));
        assert!(!battle.is_game_over());
    }

    #[test]
    fn test_bonus_magic_is_a_separate_hit() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle.hero_mut(Side::Player).equipment_state.on_hit_bonus_magic = 25.0;
        battle.hero_mut(Side::Enemy).effective_stats.evasion_chance = 0.0;

        battle.execute_attack(Side::Player);
        assert!(battle.log().contains("Knight's equipment deals 25 bonus magic damage!"));
        assert!((battle.player().equipment_state.on_hit_bonus_magic - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_end_battle_is_idempotent() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        assert!(battle.end_battle(BattleOutcome::Defeat));
        assert!(!battle.end_battle(BattleOutcome::Victory));
        assert_eq!(battle.outcome(), Some(BattleOutcome::Defeat));
        assert_eq!(battle.log().iter().filter(|l| l.contains("wins the battle")).count(), 1);
        assert_eq!(battle.log().last(), Some("💀 Defeat! Orc wins the battle!"));
    }

    #[test]
    fn test_mana_tick_rounds_up() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle.mana_tick(Side::Player);
        assert!((battle.player().current_mana - 3.0).abs() < f64::EPSILON);
        assert!((battle.enemy().current_mana - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_attack_interval_floor_and_multiplier() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        assert!((battle.attack_interval_ms(Side::Player) - 1000.0).abs() < f64::EPSILON);
        battle.set_speed_multiplier(2.0);
        assert!((battle.attack_interval_ms(Side::Player) - 500.0).abs() < f64::EPSILON);
        battle.set_speed_multiplier(10.0);
        assert!((battle.attack_interval_ms(Side::Player) - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_positive_speed_attacks_slowest() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle.hero_mut(Side::Player).effective_stats.speed = -1.0;
        assert!((battle.attack_interval_ms(Side::Player) - 10_000.0).abs() < 1e-9);

        battle.hero_mut(Side::Player).effective_stats.speed = 0.0;
        let interval = battle.attack_interval_ms(Side::Player);
        assert!(interval.is_finite());
        assert!((interval - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_attack_tick_accumulates_to_interval() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        for _ in 0..19 {
            battle.attack_tick(Side::Player);
        }
        assert!((battle.enemy().current_health - 600.0).abs() < f64::EPSILON);
        battle.attack_tick(Side::Player);
        assert!(battle.enemy().current_health < 600.0);
    }

    #[test]
    fn test_status_death_ends_battle() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 5.0, 30.0));
        battle.hero_mut(Side::Enemy).status_effects.add_stacks(StackKind::Poison, 10);
        battle.status_tick();
        assert_eq!(battle.outcome(), Some(BattleOutcome::Victory));
    }

    #[test]
    fn test_refresh_flags_redraw() {
        let mut battle = battle(hero("Knight", 500.0, 40.0), hero("Orc", 600.0, 30.0));
        battle
            .hero_mut(Side::Player)
            .purchased_abilities
            .push(AbilityDescriptor::new("Might", "attack_boost", 10.0));
        battle.refresh_tick();
        assert!(battle.take_refresh());
        assert!(!battle.take_refresh());
        assert!((battle.player().effective_stats.attack - 50.0).abs() < f64::EPSILON);
    }
}
