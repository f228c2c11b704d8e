//! BattleSnapshot - read-only view of a battle for renderers

use crate::hero::Hero;
use crate::types::BattleOutcome;
use serde::{Deserialize, Serialize};

/// One combatant as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    // === Identity ===
    pub id: String,
    pub name: String,

    // === Bars ===
    pub health: f64,
    pub max_health: f64,
    pub mana: f64,
    pub max_mana: f64,

    // === Stats ===
    pub attack: f64,
    pub armor: f64,
    /// Attacks per second
    pub speed: f64,

    /// Short labels of active status effects, e.g. `poison x12`
    pub statuses: Vec<String>,
}

impl CombatantSnapshot {
    pub fn of(hero: &Hero) -> Self {
        CombatantSnapshot {
            id: hero.id.clone(),
            name: hero.name.clone(),
            health: hero.current_health,
            max_health: hero.max_health(),
            mana: hero.current_mana,
            max_mana: hero.max_mana,
            attack: hero.effective_stats.attack,
            armor: hero.effective_stats.armor,
            speed: hero.effective_stats.speed,
            statuses: hero.status_effects.iter().map(|e| e.label()).collect(),
        }
    }

    /// Health as a ratio in `[0, 1]`
    pub fn health_ratio(&self) -> f64 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Mana as a ratio in `[0, 1]`
    pub fn mana_ratio(&self) -> f64 {
        if self.max_mana > 0.0 {
            (self.mana / self.max_mana).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// State of a battle at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub player: CombatantSnapshot,
    pub enemy: CombatantSnapshot,

    // === Progress ===
    pub game_over: bool,
    pub outcome: Option<BattleOutcome>,
    /// Battle time in milliseconds
    pub elapsed_ms: u64,
    pub damage_multiplier: f64,
    /// Number of battle log lines so far
    pub log_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hero::{BaseStats, HeroTemplate};
    use crate::status::StackKind;

    #[test]
    fn test_snapshot_reads_live_state() {
        let mut hero = Hero::from_template(&HeroTemplate::new("k", "Knight", BaseStats::new(400.0, 30.0, 10.0, 1.0)));
        hero.take_damage(100.0);
        hero.restore_mana(25.0);
        hero.status_effects.add_stacks(StackKind::Poison, 6);

        let snapshot = CombatantSnapshot::of(&hero);
        assert!((snapshot.health_ratio() - 0.75).abs() < f64::EPSILON);
        assert!((snapshot.mana_ratio() - 0.25).abs() < f64::EPSILON);
        assert_eq!(snapshot.statuses, vec!["poison x6".to_string()]);
    }
}
