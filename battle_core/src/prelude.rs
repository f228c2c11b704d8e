//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Heroes
pub use crate::hero::{AbilityDescriptor, BaseStats, EquipmentItem, Hero, HeroTemplate};
pub use crate::types::{BattleOutcome, DamageType, Side, Stat};

// Stats
pub use crate::calculator::StatsCalculator;
pub use crate::effects::EffectRegistry;
pub use crate::stat_block::EffectiveStats;

// Combat
pub use crate::combat::{BattleError, BattleSnapshot, CombatController, ControllerState, InitOptions};

// Config
pub use crate::config::{default_heroes, default_shop, CombatConstants, ShopCatalog};
