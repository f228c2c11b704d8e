//! Combat - the damage formula, battle state machine and controller

mod battle;
mod controller;
mod damage;
mod error;
mod log;
mod result;

pub use battle::Battle;
pub use controller::{CombatController, ControllerState, InitOptions};
pub use damage::{calculate_damage, fmt_amount, CombatEnv};
pub use error::{BattleError, BattleResult};
pub use log::BattleLog;
pub use result::{BattleSnapshot, CombatantSnapshot};
