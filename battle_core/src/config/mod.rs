//! Configuration loading from TOML files

mod catalog;
mod constants;

pub use catalog::{
    default_heroes, default_shop, load_hero_catalog, load_shop_catalog, parse_hero_catalog, parse_shop_catalog,
    ShopAbility, ShopCatalog, ShopItem,
};
pub use constants::{
    AbilityConstants, CombatConstants, CritConstants, CurveConstants, DamageConstants, DiminishingReturnsConstants, EscalationConstants,
    ManaConstants, StackConstants, TimingConstants,
};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load combat constants; missing keys take their defaults
pub fn load_constants(path: &Path) -> Result<CombatConstants, ConfigError> {
    let constants: CombatConstants = load_toml(path)?;
    if constants.timing.tick_rate_ms == 0 {
        return Err(ConfigError::ValidationError("timing.tick_rate_ms must be positive".to_string()));
    }
    Ok(constants)
}
