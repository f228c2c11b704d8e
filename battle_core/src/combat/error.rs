//! Battle errors

use thiserror::Error;

/// Errors raised while setting up or running a battle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("Invalid hero data: {0}")]
    InvalidHero(String),
    #[error("No enemy hero available for '{player_id}'")]
    NoEnemyAvailable { player_id: String },
    #[error("Combat has not been initialized")]
    NotInitialized,
    #[error("Battle already started")]
    AlreadyStarted,
    #[error("{hero} has no ultimate ability")]
    MissingUltimate { hero: String },
    #[error("Insufficient funds: need {cost}, have {available}")]
    InsufficientFunds { cost: u32, available: u32 },
    #[error("Callback '{id}' failed: {message}")]
    Callback { id: String, message: String },
}

pub type BattleResult<T> = Result<T, BattleError>;
