//! battle_core - Real-time auto-battle engine
//!
//! This library provides:
//! - StatsCalculator: Effective stats from base stats, abilities and equipment
//! - EffectRegistry: Purchased-ability keys mapped to stat transforms
//! - AbilitySystem: Ultimates, passives, status effects and trigger hooks
//! - GameLoop: Fixed-tick scheduler of named periodic callbacks
//! - CombatController: Battle lifecycle, attacks, deaths and the shop

pub mod abilities;
pub mod calculator;
pub mod combat;
pub mod config;
pub mod effects;
pub mod game_loop;
pub mod hero;
pub mod prelude;
pub mod source;
pub mod stat_block;
pub mod status;
pub mod types;

// Re-export core types for convenience
pub use abilities::{AbilitySystem, Trigger, TriggerKind};
pub use calculator::StatsCalculator;
pub use combat::{
    Battle, BattleError, BattleLog, BattleResult, BattleSnapshot, CombatController, CombatantSnapshot,
    ControllerState, InitOptions,
};
pub use config::{default_heroes, default_shop, CombatConstants, ConfigError, ShopCatalog};
pub use effects::{EffectCategory, EffectRegistry, StatTransform};
pub use game_loop::GameLoop;
pub use hero::{AbilityDescriptor, BaseStats, EquipmentItem, Hero, HeroTemplate};
pub use stat_block::EffectiveStats;
pub use status::{StatusEffect, StatusEffects};
pub use types::{BattleOutcome, DamageType, Side, Stat};
