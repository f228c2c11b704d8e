//! Catalog loading - hero templates and the in-battle shop

use super::ConfigError;
use crate::hero::{AbilityDescriptor, BaseStats, EquipmentItem, HeroTemplate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Container for hero templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HeroCatalog {
    #[serde(default)]
    heroes: Vec<HeroTemplate>,
}

/// A purchasable ability and its price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopAbility {
    pub cost: u32,
    #[serde(flatten)]
    pub ability: AbilityDescriptor,
}

/// A purchasable item and its price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub cost: u32,
    #[serde(flatten)]
    pub item: EquipmentItem,
}

/// Everything the in-battle shop offers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopCatalog {
    #[serde(default)]
    pub abilities: Vec<ShopAbility>,
    #[serde(default)]
    pub equipment: Vec<ShopItem>,
}

/// Load hero templates from a TOML file
pub fn load_hero_catalog(path: &Path) -> Result<Vec<HeroTemplate>, ConfigError> {
    let catalog: HeroCatalog = super::load_toml(path)?;
    validate_heroes(catalog.heroes)
}

/// Load hero templates from a TOML string
pub fn parse_hero_catalog(content: &str) -> Result<Vec<HeroTemplate>, ConfigError> {
    let catalog: HeroCatalog = super::parse_toml(content)?;
    validate_heroes(catalog.heroes)
}

fn validate_heroes(heroes: Vec<HeroTemplate>) -> Result<Vec<HeroTemplate>, ConfigError> {
    let mut seen = HashSet::new();
    for hero in &heroes {
        if !seen.insert(hero.id.as_str()) {
            return Err(ConfigError::ValidationError(format!("duplicate hero id '{}'", hero.id)));
        }
        hero.stats
            .validate()
            .map_err(|msg| ConfigError::ValidationError(format!("hero '{}': {}", hero.id, msg)))?;
    }
    Ok(heroes)
}

/// Load the shop from a TOML file
pub fn load_shop_catalog(path: &Path) -> Result<ShopCatalog, ConfigError> {
    super::load_toml(path)
}

/// Load the shop from a TOML string
pub fn parse_shop_catalog(content: &str) -> Result<ShopCatalog, ConfigError> {
    super::parse_toml(content)
}

/// Get the built-in hero catalog
pub fn default_heroes() -> Vec<HeroTemplate> {
    let toml = include_str!("../../config/heroes.toml");
    parse_hero_catalog(toml).unwrap_or_else(|_| fallback_heroes())
}

fn fallback_heroes() -> Vec<HeroTemplate> {
    vec![
        HeroTemplate::new("warrior", "Warrior", BaseStats::new(1200.0, 45.0, 8.0, 1.0))
            .with_passive("Warrior Training")
            .with_ultimate("Charge"),
        HeroTemplate::new("mage", "Mage", BaseStats::new(800.0, 75.0, 3.0, 1.15))
            .with_passive("Arcane Mastery")
            .with_ultimate("Fireball"),
    ]
}

/// Get the built-in shop
pub fn default_shop() -> ShopCatalog {
    let toml = include_str!("../../config/shop.toml");
    parse_shop_catalog(toml).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heroes() {
        let toml = r#"
[[heroes]]
id = "paladin"
name = "Paladin"
avatar = "🛡️"

[heroes.stats]
health = 1100
attack = 54
armor = 7
speed = 0.85
crit_chance = 0.05

[heroes.abilities.passive]
name = "Divine Blessing"

[heroes.abilities.ultimate]
name = "Holy Strike"
"#;

        let heroes = parse_hero_catalog(toml).unwrap();
        assert_eq!(heroes.len(), 1);
        let paladin = &heroes[0];
        assert_eq!(paladin.id, "paladin");
        assert!((paladin.stats.crit_damage - 1.5).abs() < f64::EPSILON);
        assert_eq!(paladin.abilities.ultimate.as_ref().map(|u| u.name.as_str()), Some("Holy Strike"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let toml = r#"
[[heroes]]
id = "a"
name = "A"
stats = { health = 10, attack = 1, speed = 1 }

[[heroes]]
id = "a"
name = "Other A"
stats = { health = 10, attack = 1, speed = 1 }
"#;
        assert!(matches!(parse_hero_catalog(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_invalid_stats_rejected() {
        let toml = r#"
[[heroes]]
id = "ghost"
name = "Ghost"
stats = { health = 0, attack = 1, speed = 1 }
"#;
        assert!(matches!(parse_hero_catalog(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_default_catalogs_load() {
        let heroes = default_heroes();
        assert!(heroes.len() >= 2);
        assert!(heroes.iter().all(|h| h.abilities.ultimate.is_some()));
        assert_eq!(heroes, parse_hero_catalog(include_str!("../../config/heroes.toml")).unwrap());

        let shop = default_shop();
        assert!(!shop.abilities.is_empty());
        assert!(!shop.equipment.is_empty());
    }

    #[test]
    fn test_parse_shop_with_nested_effects() {
        let toml = r#"
[[abilities]]
cost = 3
name = "Burst Toxin"
effect = "crit_poison"
value = 4

[[equipment]]
cost = 5
type = "javelin"
name = "Javelin"

[equipment.effects]
attackSpeedPct = 10
onHitMagicProc = { chancePct = 25, bonusDamage = 40 }
"#;

        let shop = parse_shop_catalog(toml).unwrap();
        assert_eq!(shop.abilities[0].ability.effect, "crit_poison");
        assert!((shop.abilities[0].ability.value - 4.0).abs() < f64::EPSILON);
        let javelin = &shop.equipment[0];
        assert_eq!(javelin.cost, 5);
        assert_eq!(javelin.item.numeric_effects().collect::<Vec<_>>(), vec![("attackSpeedPct", 10.0)]);
        assert!(javelin.item.effects["onHitMagicProc"].is_object());
    }
}
