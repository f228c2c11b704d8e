//! Passive abilities, resolved once per attack

use super::AbilitySystem;
use crate::combat::CombatEnv;
use crate::hero::Hero;
use crate::status::StatusEffect;

const WARRIOR_TRAINING_REDUCTION: f64 = 0.2;
const ARCANE_MASTERY_MANA: f64 = 5.0;
const DIVINE_BLESSING_HEAL_PCT: f64 = 0.05;

/// How a passive changes the attack being resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassiveOutcome {
    /// Adds the passive crit bonus to this attack
    pub critical_hit: bool,
}

impl AbilitySystem {
    /// Resolve `hero`'s passive for the attack it is about to make
    pub fn process_passive_ability(&self, env: &mut CombatEnv<'_>, hero: &mut Hero) -> PassiveOutcome {
        let Some(name) = hero.abilities.passive.as_ref().map(|p| p.name.clone()) else {
            return PassiveOutcome::default();
        };

        let constants = env.constants;
        let tuning = &constants.abilities;
        match name.as_str() {
            "Warrior Training" => {
                if hero.health_fraction() < tuning.warrior_training_below && !hero.status_effects.has("damage_reduction") {
                    hero.status_effects.push(StatusEffect::DamageReduction {
                        reduction: WARRIOR_TRAINING_REDUCTION,
                        ticks_remaining: 1,
                    });
                }
            }
            "Arcane Mastery" => hero.restore_mana(ARCANE_MASTERY_MANA),
            "Eagle Eye" => {
                if env.roll(tuning.eagle_eye_chance) {
                    env.log(format!("🎯 {}'s Eagle Eye grants a precision strike!", hero.name));
                    return PassiveOutcome { critical_hit: true };
                }
            }
            "Shadow Step" => {
                if env.roll(tuning.shadow_step_chance) {
                    hero.status_effects.push(StatusEffect::Dodge {
                        chance: 1.0,
                        ticks_remaining: 1,
                    });
                }
            }
            "Divine Blessing" => {
                if hero.health_fraction() < tuning.divine_blessing_below {
                    let amount = (hero.max_health() * DIVINE_BLESSING_HEAL_PCT).round();
                    hero.heal(amount);
                }
            }
            // Dark Aura and unknown passives have no per-attack effect
            _ => {}
        }
        PassiveOutcome::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::BattleLog;
    use crate::config::CombatConstants;
    use crate::hero::{BaseStats, HeroTemplate};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn with_passive(passive: &str) -> Hero {
        let template = HeroTemplate::new("h", "Hero", BaseStats::new(1000.0, 50.0, 0.0, 1.0)).with_passive(passive);
        Hero::from_template(&template)
    }

    fn resolve(hero: &mut Hero, seed: u64) -> (PassiveOutcome, BattleLog) {
        let system = AbilitySystem::default();
        let mut log = BattleLog::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let constants = CombatConstants::default();
        let mut env = CombatEnv::new(&mut log, &mut rng, &constants);
        let outcome = system.process_passive_ability(&mut env, hero);
        (outcome, log)
    }

    #[test]
    fn test_warrior_training_adds_one_reduction() {
        let mut hero = with_passive("Warrior Training");
        resolve(&mut hero, 1);
        assert!(hero.status_effects.is_empty());

        hero.take_damage(600.0);
        resolve(&mut hero, 1);
        resolve(&mut hero, 1);
        assert_eq!(hero.status_effects.len(), 1);
        assert!(hero.status_effects.has("damage_reduction"));
    }

    #[test]
    fn test_arcane_mastery_restores_mana() {
        let mut hero = with_passive("Arcane Mastery");
        resolve(&mut hero, 1);
        assert!((hero.current_mana - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_eagle_eye_eventually_fires() {
        let mut hero = with_passive("Eagle Eye");
        let fired = (0..200).any(|seed| resolve(&mut hero, seed).0.critical_hit);
        assert!(fired);
    }

    #[test]
    fn test_divine_blessing_only_when_low() {
        let mut hero = with_passive("Divine Blessing");
        hero.take_damage(500.0);
        resolve(&mut hero, 1);
        assert!((hero.current_health - 500.0).abs() < f64::EPSILON);

        hero.take_damage(300.0);
        resolve(&mut hero, 1);
        assert!((hero.current_health - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_passive_is_a_no_op() {
        let mut hero = Hero::from_template(&HeroTemplate::new("h", "Hero", BaseStats::new(100.0, 5.0, 0.0, 1.0)));
        assert_eq!(resolve(&mut hero, 1).0, PassiveOutcome::default());
    }
}
