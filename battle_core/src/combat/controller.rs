//! Combat controller - battle lifecycle, scheduling and the in-battle shop
//!
//! The controller picks an enemy, builds a [`Battle`], registers every
//! combat channel on one [`GameLoop`] and forwards outcomes to the caller's
//! callbacks. It is driven by calling [`CombatController::tick`] once per
//! loop tick.

use crate::abilities::Trigger;
use crate::combat::{Battle, BattleError, BattleResult, BattleSnapshot};
use crate::config::{CombatConstants, TimingConstants};
use crate::game_loop::GameLoop;
use crate::hero::{AbilityDescriptor, EquipmentItem, Hero, HeroTemplate};
use crate::types::{BattleOutcome, Side};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::{debug, info};

type BattleEndFn = Box<dyn FnMut(BattleOutcome)>;
type MoneyChangeFn = Box<dyn FnMut(u32)>;
type PurchaseFn = Box<dyn FnMut()>;
type UpdateFn = Box<dyn FnMut(&BattleSnapshot)>;

/// Where the controller is in a battle's life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    /// Battle built, loop not running yet
    Initialized,
    Battling,
    GameOver,
}

/// Options for [`CombatController::init`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOptions {
    /// Start the battle right after initialization
    pub auto_start: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        InitOptions { auto_start: true }
    }
}

/// Orchestrates one battle at a time
pub struct CombatController {
    game_loop: GameLoop<Battle>,
    battle: Option<Battle>,
    rng: StdRng,
    catalog: Vec<HeroTemplate>,
    constants: CombatConstants,
    player_money: u32,
    state: ControllerState,
    /// Outcome waiting to be announced, with milliseconds left before it is
    end_notice: Option<(BattleOutcome, u64)>,

    // === Callbacks ===
    on_battle_end: Option<BattleEndFn>,
    on_money_change: Option<MoneyChangeFn>,
    on_ability_purchased: Option<PurchaseFn>,
    on_update: Option<UpdateFn>,
}

impl CombatController {
    /// Create a controller drawing enemies from `catalog`
    pub fn new(catalog: Vec<HeroTemplate>, constants: CombatConstants) -> Self {
        CombatController {
            game_loop: GameLoop::new(constants.timing.tick_rate_ms),
            battle: None,
            rng: StdRng::from_entropy(),
            catalog,
            constants,
            player_money: 0,
            state: ControllerState::Uninitialized,
            end_notice: None,
            on_battle_end: None,
            on_money_change: None,
            on_ability_purchased: None,
            on_update: None,
        }
    }

    /// Make enemy selection and every battle roll reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // === Callbacks ===

    /// Called once per battle, a fixed delay after it ends
    pub fn set_on_battle_end(&mut self, callback: impl FnMut(BattleOutcome) + 'static) {
        self.on_battle_end = Some(Box::new(callback));
    }

    /// Called with the new balance whenever the player's money changes
    pub fn set_on_money_change(&mut self, callback: impl FnMut(u32) + 'static) {
        self.on_money_change = Some(Box::new(callback));
    }

    pub fn set_on_ability_purchased(&mut self, callback: impl FnMut() + 'static) {
        self.on_ability_purchased = Some(Box::new(callback));
    }

    /// Called on every stat refresh with a fresh snapshot
    pub fn set_on_update(&mut self, callback: impl FnMut(&BattleSnapshot) + 'static) {
        self.on_update = Some(Box::new(callback));
    }

    // === Lifecycle ===

    /// Set up a battle for `player` against a random catalog hero
    ///
    /// The enemy is never the player's own hero id. Fails with
    /// [`BattleError::InvalidHero`] or [`BattleError::NoEnemyAvailable`],
    /// in which case no battle is started.
    pub fn init(&mut self, player: Hero, player_money: u32, options: InitOptions) -> BattleResult<()> {
        player.stats.validate().map_err(BattleError::InvalidHero)?;
        let enemy = self.pick_enemy(&player.id)?;
        self.init_against(player, Hero::from_template(&enemy), player_money, options)
    }

    /// Set up a battle against a chosen enemy
    pub fn init_against(&mut self, player: Hero, enemy: Hero, player_money: u32, options: InitOptions) -> BattleResult<()> {
        player.stats.validate().map_err(BattleError::InvalidHero)?;
        enemy.stats.validate().map_err(BattleError::InvalidHero)?;

        self.clear_timers();
        let rng = StdRng::seed_from_u64(self.rng.gen());
        info!(player = %player.name, enemy = %enemy.name, money = player_money, "combat initialized");
        self.battle = Some(Battle::new(player, enemy, self.constants.clone(), rng));
        self.player_money = player_money;
        self.state = ControllerState::Initialized;
        self.end_notice = None;

        if options.auto_start {
            self.start_battle()?;
        }
        Ok(())
    }

    fn pick_enemy(&mut self, player_id: &str) -> BattleResult<HeroTemplate> {
        let candidates: Vec<&HeroTemplate> = self.catalog.iter().filter(|t| t.id != player_id).collect();
        candidates
            .choose(&mut self.rng)
            .map(|t| (*t).clone())
            .ok_or_else(|| BattleError::NoEnemyAvailable {
                player_id: player_id.to_string(),
            })
    }

    /// Fire battle-start hooks and register every combat channel
    pub fn start_battle(&mut self) -> BattleResult<()> {
        match self.state {
            ControllerState::Uninitialized => return Err(BattleError::NotInitialized),
            ControllerState::Battling | ControllerState::GameOver => return Err(BattleError::AlreadyStarted),
            ControllerState::Initialized => {}
        }
        let battle = self.battle.as_mut().ok_or(BattleError::NotInitialized)?;

        battle.begin();
        register_channels(&mut self.game_loop, &self.constants.timing);
        self.game_loop.start();
        self.state = ControllerState::Battling;

        if let Some(outcome) = battle.outcome() {
            self.finish(outcome);
        }
        Ok(())
    }

    /// Advance the battle by one loop tick
    ///
    /// After the battle ends, keeps counting down until the end
    /// notification is due.
    pub fn tick(&mut self) {
        match self.state {
            ControllerState::Battling => self.tick_battle(),
            ControllerState::GameOver => self.tick_end_notice(),
            ControllerState::Uninitialized | ControllerState::Initialized => {}
        }
    }

    fn tick_battle(&mut self) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        battle.set_elapsed((self.game_loop.tick_count() + 1) * self.game_loop.tick_rate_ms());
        self.game_loop.tick(battle);

        if battle.take_refresh() {
            if let Some(on_update) = self.on_update.as_mut() {
                on_update(&battle.snapshot());
            }
        }
        if let Some(outcome) = battle.outcome() {
            self.finish(outcome);
        }
    }

    fn tick_end_notice(&mut self) {
        let Some((outcome, remaining)) = self.end_notice else {
            return;
        };
        let remaining = remaining.saturating_sub(self.game_loop.tick_rate_ms());
        if remaining > 0 {
            self.end_notice = Some((outcome, remaining));
            return;
        }
        self.end_notice = None;
        debug!(outcome = %outcome, "battle end notified");
        if let Some(on_battle_end) = self.on_battle_end.as_mut() {
            on_battle_end(outcome);
        }
    }

    /// End the current battle; repeated calls do nothing
    pub fn end_battle(&mut self, outcome: BattleOutcome) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        if battle.end_battle(outcome) {
            self.finish(outcome);
        }
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        if self.state == ControllerState::GameOver {
            return;
        }
        self.game_loop.stop();
        self.state = ControllerState::GameOver;
        self.end_notice = Some((outcome, self.constants.timing.battle_end_delay_ms));
    }

    /// Stop the loop and drop every registered channel
    pub fn clear_timers(&mut self) {
        self.game_loop.stop();
    }

    /// Drop the battle entirely
    pub fn teardown(&mut self) {
        self.clear_timers();
        self.battle = None;
        self.end_notice = None;
        self.state = ControllerState::Uninitialized;
    }

    /// Tick until the battle ends or `max_ticks` have run
    pub fn run_to_end(&mut self, max_ticks: u64) -> Option<BattleOutcome> {
        for _ in 0..max_ticks {
            if self.state != ControllerState::Battling {
                break;
            }
            self.tick();
        }
        self.battle.as_ref().and_then(Battle::outcome)
    }

    // === Tuning ===

    pub fn set_damage_multiplier(&mut self, multiplier: f64) {
        if let Some(battle) = self.battle.as_mut() {
            battle.set_damage_multiplier(multiplier);
        }
    }

    /// Scale attack cadence; 2.0 attacks twice as often (down to the interval floor)
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        if let Some(battle) = self.battle.as_mut() {
            battle.set_speed_multiplier(multiplier);
        }
    }

    // === Shop ===

    /// Buy an ability for the player mid-battle
    pub fn purchase_ability(&mut self, ability: AbilityDescriptor, cost: u32) -> BattleResult<()> {
        let name = ability.name.clone();
        self.spend(cost, |player| player.purchased_abilities.push(ability))?;
        info!(ability = %name, cost, money = self.player_money, "ability purchased");
        if let Some(on_ability_purchased) = self.on_ability_purchased.as_mut() {
            on_ability_purchased();
        }
        Ok(())
    }

    /// Equip an item on the player mid-battle
    pub fn equip_item(&mut self, item: EquipmentItem, cost: u32) -> BattleResult<()> {
        let name = item.name.clone();
        self.spend(cost, |player| player.equip(item))?;
        info!(item = %name, cost, money = self.player_money, "item equipped");
        Ok(())
    }

    /// Charge the player, apply the purchase and recompute the player's stats
    fn spend(&mut self, cost: u32, apply: impl FnOnce(&mut Hero)) -> BattleResult<()> {
        let battle = self.battle.as_mut().ok_or(BattleError::NotInitialized)?;
        if cost > self.player_money {
            return Err(BattleError::InsufficientFunds {
                cost,
                available: self.player_money,
            });
        }
        self.player_money -= cost;
        apply(battle.hero_mut(Side::Player));
        battle.refresh_stats(Side::Player);

        if let Some(on_money_change) = self.on_money_change.as_mut() {
            on_money_change(self.player_money);
        }
        Ok(())
    }

    // === Accessors ===

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == ControllerState::GameOver
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn battle_mut(&mut self) -> Option<&mut Battle> {
        self.battle.as_mut()
    }

    pub fn snapshot(&self) -> Option<BattleSnapshot> {
        self.battle.as_ref().map(Battle::snapshot)
    }

    pub fn player_money(&self) -> u32 {
        self.player_money
    }

    pub fn catalog(&self) -> &[HeroTemplate] {
        &self.catalog
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    pub fn game_loop(&self) -> &GameLoop<Battle> {
        &self.game_loop
    }
}

impl fmt::Debug for CombatController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatController")
            .field("state", &self.state)
            .field("player_money", &self.player_money)
            .field("catalog", &self.catalog.len())
            .field("game_loop", &self.game_loop)
            .field("end_notice", &self.end_notice)
            .finish()
    }
}

/// Register every combat channel, in firing order within a tick
fn register_channels(game_loop: &mut GameLoop<Battle>, timing: &TimingConstants) {
    // stat refresh follows the mana cadence
    let channels: [(&str, fn(&mut Battle), u64); 13] = [
        ("player_attack", |b| b.attack_tick(Side::Player), timing.tick_rate_ms),
        ("enemy_attack", |b| b.attack_tick(Side::Enemy), timing.tick_rate_ms),
        ("player_mana", |b| b.mana_tick(Side::Player), timing.mana_interval_ms),
        ("enemy_mana", |b| b.mana_tick(Side::Enemy), timing.mana_interval_ms),
        ("refresh", Battle::refresh_tick, timing.mana_interval_ms),
        ("status", Battle::status_tick, timing.status_interval_ms),
        ("enhanced", |b| b.channel_tick(Trigger::EnhancedTick), timing.enhanced_interval_ms),
        ("hp_loss", |b| b.channel_tick(Trigger::HpLossTick), timing.hp_loss_interval_ms),
        ("drums", |b| b.channel_tick(Trigger::DrumsTick), timing.drums_interval_ms),
        ("frost_nova", |b| b.channel_tick(Trigger::FrostNovaTick), timing.frost_nova_interval_ms),
        ("shield_loss", Battle::shield_loss_tick, timing.shield_loss_interval_ms),
        ("frostbite", Battle::frostbite_tick, timing.frostbite_interval_ms),
        ("equipment", Battle::equipment_tick, timing.equipment_interval_ms),
    ];
    for (id, run, interval) in channels {
        game_loop.register(
            id,
            move |battle: &mut Battle| {
                run(battle);
                Ok(())
            },
            interval,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::BaseStats;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn template(id: &str, health: f64, attack: f64) -> HeroTemplate {
        HeroTemplate::new(id, id, BaseStats::new(health, attack, 0.0, 1.0)).with_ultimate("Fireball")
    }

    fn catalog() -> Vec<HeroTemplate> {
        vec![template("knight", 500.0, 40.0), template("orc", 400.0, 30.0)]
    }

    fn controller() -> CombatController {
        CombatController::new(catalog(), CombatConstants::default()).with_seed(3)
    }

    fn knight() -> Hero {
        Hero::from_template(&template("knight", 500.0, 40.0))
    }

    #[test]
    fn test_init_never_picks_players_own_hero() {
        for seed in 0..20 {
            let mut controller = CombatController::new(catalog(), CombatConstants::default()).with_seed(seed);
            controller.init(knight(), 0, InitOptions::default()).unwrap();
            assert_eq!(controller.battle().unwrap().enemy().id, "orc");
        }
    }

    #[test]
    fn test_init_without_enemy_fails() {
        let mut controller = CombatController::new(vec![template("knight", 500.0, 40.0)], CombatConstants::default());
        let err = controller.init(knight(), 0, InitOptions::default()).unwrap_err();
        assert_eq!(
            err,
            BattleError::NoEnemyAvailable {
                player_id: "knight".to_string()
            }
        );
        assert_eq!(controller.state(), ControllerState::Uninitialized);
    }

    #[test]
    fn test_init_rejects_invalid_hero() {
        let mut controller = controller();
        let mut broken = knight();
        broken.stats.health = f64::NAN;
        assert!(matches!(
            controller.init(broken, 0, InitOptions::default()),
            Err(BattleError::InvalidHero(_))
        ));
        assert!(controller.battle().is_none());
    }

    #[test]
    fn test_manual_start() {
        let mut controller = controller();
        assert_eq!(controller.start_battle(), Err(BattleError::NotInitialized));

        controller.init(knight(), 0, InitOptions { auto_start: false }).unwrap();
        assert_eq!(controller.state(), ControllerState::Initialized);
        assert!(!controller.game_loop().is_running());

        controller.start_battle().unwrap();
        assert_eq!(controller.state(), ControllerState::Battling);
        assert_eq!(controller.start_battle(), Err(BattleError::AlreadyStarted));
    }

    #[test]
    fn test_channels_registered_with_quantized_intervals() {
        let mut controller = controller();
        controller.init(knight(), 0, InitOptions::default()).unwrap();
        let game_loop = controller.game_loop();

        assert_eq!(game_loop.len(), 13);
        assert_eq!(game_loop.tick_interval("player_attack"), Some(1));
        assert_eq!(game_loop.tick_interval("player_mana"), Some(5));
        assert_eq!(game_loop.tick_interval("status"), Some(20));
        assert_eq!(game_loop.tick_interval("enhanced"), Some(16));
        assert_eq!(game_loop.tick_interval("hp_loss"), Some(30));
        assert_eq!(game_loop.tick_interval("drums"), Some(40));
        assert_eq!(game_loop.tick_interval("shield_loss"), Some(36));
    }

    #[test]
    fn test_battle_runs_to_end_and_notifies_once() {
        let outcomes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outcomes);
        let mut controller = controller();
        controller.set_on_battle_end(move |outcome| sink.borrow_mut().push(outcome));
        controller.init(knight(), 0, InitOptions::default()).unwrap();

        let outcome = controller.run_to_end(20_000);
        assert!(outcome.is_some());
        assert!(controller.is_game_over());
        assert!(!controller.game_loop().is_running());
        assert!(outcomes.borrow().is_empty());

        // 3000ms at 50ms per tick
        for _ in 0..59 {
            controller.tick();
        }
        assert!(outcomes.borrow().is_empty());
        controller.tick();
        assert_eq!(outcomes.borrow().as_slice(), &[outcome.unwrap()]);

        for _ in 0..100 {
            controller.tick();
        }
        assert_eq!(outcomes.borrow().len(), 1);
    }

    #[test]
    fn test_end_battle_twice_notifies_once() {
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let mut controller = controller();
        controller.set_on_battle_end(move |_| *sink.borrow_mut() += 1);
        controller.init(knight(), 0, InitOptions::default()).unwrap();

        controller.end_battle(BattleOutcome::Victory);
        controller.end_battle(BattleOutcome::Defeat);
        for _ in 0..200 {
            controller.tick();
        }
        assert_eq!(*count.borrow(), 1);
        assert_eq!(controller.battle().unwrap().outcome(), Some(BattleOutcome::Victory));
    }

    #[test]
    fn test_elapsed_follows_tick_count() {
        let mut controller = controller();
        controller.init(knight(), 0, InitOptions::default()).unwrap();
        for _ in 0..10 {
            controller.tick();
        }
        assert_eq!(controller.snapshot().unwrap().elapsed_ms, 500);
    }

    #[test]
    fn test_update_callback_on_refresh() {
        let updates = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&updates);
        let mut controller = controller();
        controller.set_on_update(move |_| *sink.borrow_mut() += 1);
        controller.init(knight(), 0, InitOptions::default()).unwrap();
        for _ in 0..10 {
            controller.tick();
        }
        assert_eq!(*updates.borrow(), 2);
    }

    #[test]
    fn test_purchase_ability() {
        let money = Rc::new(RefCell::new(Vec::new()));
        let purchases = Rc::new(RefCell::new(0));
        let (money_sink, purchase_sink) = (Rc::clone(&money), Rc::clone(&purchases));

        let mut controller = controller();
        controller.set_on_money_change(move |gold| money_sink.borrow_mut().push(gold));
        controller.set_on_ability_purchased(move || *purchase_sink.borrow_mut() += 1);
        controller.init(knight(), 100, InitOptions { auto_start: false }).unwrap();

        let might = AbilityDescriptor::new("Might", "attack_boost", 10.0);
        assert_eq!(
            controller.purchase_ability(might.clone(), 150),
            Err(BattleError::InsufficientFunds { cost: 150, available: 100 })
        );
        controller.purchase_ability(might, 60).unwrap();

        assert_eq!(controller.player_money(), 40);
        assert_eq!(money.borrow().as_slice(), &[40]);
        assert_eq!(*purchases.borrow(), 1);
        let player = controller.battle().unwrap().player();
        assert!((player.effective_stats.attack - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_equip_item_recomputes_stats() {
        let mut controller = controller();
        controller.init(knight(), 50, InitOptions::default()).unwrap();
        let blade = EquipmentItem::new("weapon", "Blade").with_effect("attackFlat", 15);
        controller.equip_item(blade, 50).unwrap();

        assert_eq!(controller.player_money(), 0);
        let player = controller.battle().unwrap().player();
        assert!((player.effective_stats.attack - 55.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_equipped_behaviours_fire_mid_battle() {
        let mut controller = controller();
        controller.init(knight(), 10, InitOptions::default()).unwrap();
        let gauntlets = EquipmentItem::new("gauntlets", "Gauntlets").with_effect("guaranteedCritCooldownSec", 1);
        controller.equip_item(gauntlets, 5).unwrap();
        assert_eq!(controller.battle().unwrap().player().item_behaviours.len(), 1);

        // the equipment channel runs once a second
        for _ in 0..20 {
            controller.tick();
        }
        let player = controller.battle().unwrap().player();
        assert!(player.battle_flags.last_fired_ms.contains_key("gauntlets#0:guaranteedCritCooldownSec"));
    }

    #[test]
    fn test_shop_requires_battle() {
        let mut controller = controller();
        let err = controller.purchase_ability(AbilityDescriptor::new("Might", "attack_boost", 10.0), 0);
        assert_eq!(err, Err(BattleError::NotInitialized));
    }
}
