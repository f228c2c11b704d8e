//! Property tests for the stat pipeline, damage formula and game loop

use battle_core::combat::{calculate_damage, BattleLog, CombatEnv};
use battle_core::config::CurveConstants;
use battle_core::prelude::*;
use battle_core::status::StackKind;
use battle_core::{Battle, GameLoop};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::rc::Rc;

/// Effect keys that move the numbers combat reads
const STAT_KEYS: &[&str] = &[
    "attack_boost",
    "health_boost",
    "armor_boost",
    "speed_boost",
    "crit_chance",
    "crit_multiplier",
    "health_percentage_boost",
    "ultimate_power",
    "stat_boost",
    "magic_amp",
];

fn hero(health: f64, attack: f64, armor: f64, speed: f64) -> Hero {
    Hero::from_template(&HeroTemplate::new("prop", "Prop", BaseStats::new(health, attack, armor, speed)))
}

fn abilities() -> impl Strategy<Value = Vec<AbilityDescriptor>> {
    prop::collection::vec((0..STAT_KEYS.len(), 0.0f64..60.0), 0..8).prop_map(|picks| {
        picks
            .into_iter()
            .map(|(i, value)| AbilityDescriptor::new(STAT_KEYS[i], STAT_KEYS[i], value))
            .collect()
    })
}

/// A catalog hero with rolled stats and shop purchases
fn shop_hero(
    template: usize,
    stats: (f64, f64, f64, f64),
    ability_picks: &[usize],
    item_picks: &[usize],
) -> Hero {
    let heroes = default_heroes();
    let shop = default_shop();
    let mut template = heroes[template % heroes.len()].clone();
    let (health, attack, armor, speed) = stats;
    template.stats.health = health;
    template.stats.attack = attack;
    template.stats.armor = armor;
    template.stats.speed = speed;

    let mut hero = Hero::from_template(&template);
    for &pick in ability_picks {
        hero = hero.with_ability(shop.abilities[pick % shop.abilities.len()].ability.clone());
    }
    for &pick in item_picks {
        hero = hero.with_equipment(shop.equipment[pick % shop.equipment.len()].item.clone());
    }
    hero
}

fn rolled_stats() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (100.0f64..2000.0, 0.0f64..400.0, 0.0f64..120.0, 0.3f64..3.0)
}

fn mana() -> impl Strategy<Value = f64> {
    prop_oneof![Just(100.0), 0.0f64..100.0]
}

fn assert_in_bounds(hero: &Hero) -> Result<(), TestCaseError> {
    prop_assert!(hero.current_health >= 0.0, "{} at {}", hero.name, hero.current_health);
    prop_assert!(
        hero.current_health <= hero.max_health() + 1e-9,
        "{} at {} of {}",
        hero.name,
        hero.current_health,
        hero.max_health()
    );
    Ok(())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn diminishing_returns_monotonic(a in 0.0f64..2000.0, b in 0.0f64..2000.0) {
        let constants = CombatConstants::default();
        let curves = &constants.diminishing_returns;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        for curve in [curves.attack, curves.armor, curves.speed] {
            prop_assert!(curve.apply(lo) <= curve.apply(hi));
            prop_assert!(curve.apply(hi) <= hi + 1e-12);
        }
    }

    #[test]
    fn curve_is_continuous_at_threshold(threshold in 1.0f64..500.0, factor in 0.0f64..1.0) {
        let curve = CurveConstants { threshold, factor };
        prop_assert!(close(curve.apply(threshold), threshold));
        prop_assert!(close(curve.apply(threshold + 10.0), threshold + 10.0 * factor));
    }

    #[test]
    fn effects_fold_in_any_order(list in abilities(), rotate in 0usize..8) {
        let calc = StatsCalculator::default();
        let mut forward = hero(1000.0, 60.0, 10.0, 1.2);
        forward.purchased_abilities = list.clone();

        let mut shuffled = list;
        shuffled.reverse();
        if !shuffled.is_empty() {
            let k = rotate % shuffled.len();
            shuffled.rotate_left(k);
        }
        let mut backward = hero(1000.0, 60.0, 10.0, 1.2);
        backward.purchased_abilities = shuffled;

        let a = calc.compute_stats(&forward);
        let b = calc.compute_stats(&backward);
        for &stat in Stat::all() {
            prop_assert!(close(a.get(stat), b.get(stat)), "{:?}: {} vs {}", stat, a.get(stat), b.get(stat));
        }
        prop_assert_eq!(a.derived.keys().collect::<Vec<_>>(), b.derived.keys().collect::<Vec<_>>());
    }

    #[test]
    fn health_stays_in_bounds(ops in prop::collection::vec((any::<bool>(), 0.0f64..3000.0), 1..40)) {
        let mut hero = hero(900.0, 50.0, 5.0, 1.0);
        hero.effective_stats = StatsCalculator::default().compute_stats(&hero);
        hero.set_health(hero.max_health());

        for (is_heal, amount) in ops {
            if is_heal {
                hero.heal(amount);
            } else {
                hero.take_damage(amount);
            }
            prop_assert!(hero.current_health >= 0.0);
            prop_assert!(hero.current_health <= hero.max_health());
        }
    }

    #[test]
    fn attacks_keep_health_in_bounds(
        templates in (0usize..16, 0usize..16),
        stats in (rolled_stats(), rolled_stats()),
        bought in (prop::collection::vec(0usize..64, 0..6), prop::collection::vec(0usize..64, 0..6)),
        items in (prop::collection::vec(0usize..64, 0..4), prop::collection::vec(0usize..64, 0..4)),
        manas in (mana(), mana()),
        shields in (0u32..200, 0u32..200),
        seed in any::<u64>(),
        rounds in 1usize..30,
    ) {
        let player = shop_hero(templates.0, stats.0, &bought.0, &items.0);
        let enemy = shop_hero(templates.1, stats.1, &bought.1, &items.1);
        let mut battle = Battle::new(player, enemy, CombatConstants::default(), StdRng::seed_from_u64(seed));
        battle.begin();

        battle.hero_mut(Side::Player).current_mana = manas.0;
        battle.hero_mut(Side::Enemy).current_mana = manas.1;
        battle.hero_mut(Side::Player).status_effects.add_stacks(StackKind::Shield, shields.0);
        battle.hero_mut(Side::Enemy).status_effects.add_stacks(StackKind::Shield, shields.1);

        for _ in 0..rounds {
            for side in [Side::Player, Side::Enemy] {
                battle.execute_attack(side);
                assert_in_bounds(battle.player())?;
                assert_in_bounds(battle.enemy())?;
            }
            if battle.is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn unshielded_damage_is_floored(attack in 0.0f64..600.0, armor in 0.0f64..150.0, multiplier in 1.0f64..4.0) {
        let constants = CombatConstants::default();
        let mut log = BattleLog::new();
        let mut rng = StdRng::seed_from_u64(0);
        let mut target = hero(1000.0, 10.0, armor, 1.0);
        target.effective_stats = StatsCalculator::default().compute_stats(&target);

        let mut env = CombatEnv::new(&mut log, &mut rng, &constants).with_damage_multiplier(multiplier);
        let damage = calculate_damage(&mut env, attack, &mut target, DamageType::Physical, None);
        prop_assert!(damage >= constants.damage.min_damage);
        prop_assert!(damage <= (attack * multiplier).round().max(constants.damage.min_damage));
        prop_assert_eq!(damage, damage.round());
    }

    #[test]
    fn loop_fires_on_quantized_interval(interval_ms in 1u64..5000, rate_pick in 0usize..3, ticks in 1u64..400) {
        let tick_rate_ms = [10u64, 50, 100][rate_pick];
        let mut game_loop: GameLoop<()> = GameLoop::new(tick_rate_ms);
        let fired = Rc::new(Cell::new(0u64));
        let counter = Rc::clone(&fired);
        game_loop.register("counter", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        }, interval_ms);
        game_loop.start();

        for _ in 0..ticks {
            game_loop.tick(&mut ());
        }

        let quantized = ((interval_ms as f64 / tick_rate_ms as f64).round() as u64).max(1);
        prop_assert_eq!(game_loop.tick_interval("counter"), Some(quantized));
        prop_assert_eq!(fired.get(), ticks / quantized);
    }
}
