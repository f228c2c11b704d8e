//! Catalog-facing hero, ability and equipment descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base numeric block of a hero; never touched by combat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub health: f64,
    pub attack: f64,
    /// Percentage of physical damage removed
    #[serde(default)]
    pub armor: f64,
    /// Attacks per second
    pub speed: f64,
    #[serde(default)]
    pub crit_chance: f64,
    #[serde(default = "default_crit_damage")]
    pub crit_damage: f64,
    #[serde(default)]
    pub evasion_chance: f64,
    #[serde(default = "default_evasion_damage_reduction")]
    pub evasion_damage_reduction: f64,
    #[serde(default)]
    pub magic_damage_reduction: f64,
    #[serde(default)]
    pub physical_damage_reduction: f64,
    #[serde(default)]
    pub physical_damage_amplification: f64,
    #[serde(default)]
    pub magic_damage_amplification: f64,
    #[serde(default)]
    pub mana_regeneration: f64,
}

fn default_crit_damage() -> f64 {
    1.5
}

fn default_evasion_damage_reduction() -> f64 {
    0.6
}

impl BaseStats {
    /// Create base stats from the four core numbers
    pub fn new(health: f64, attack: f64, armor: f64, speed: f64) -> Self {
        BaseStats {
            health,
            attack,
            armor,
            speed,
            crit_chance: 0.0,
            crit_damage: default_crit_damage(),
            evasion_chance: 0.0,
            evasion_damage_reduction: default_evasion_damage_reduction(),
            magic_damage_reduction: 0.0,
            physical_damage_reduction: 0.0,
            physical_damage_amplification: 0.0,
            magic_damage_amplification: 0.0,
            mana_regeneration: 0.0,
        }
    }

    /// Describe the first problem that makes these stats unusable in a battle
    pub fn validate(&self) -> Result<(), String> {
        let core = [
            ("health", self.health),
            ("attack", self.attack),
            ("armor", self.armor),
            ("speed", self.speed),
        ];
        for (name, value) in core {
            if !value.is_finite() {
                return Err(format!("{} is not a finite number", name));
            }
        }
        if self.health <= 0.0 {
            return Err(format!("health must be positive, got {}", self.health));
        }
        if self.attack < 0.0 {
            return Err(format!("attack must not be negative, got {}", self.attack));
        }
        if self.speed <= 0.0 {
            return Err(format!("speed must be positive, got {}", self.speed));
        }
        Ok(())
    }
}

/// A named hero-defined special move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRef {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl AbilityRef {
    pub fn new(name: impl Into<String>) -> Self {
        AbilityRef {
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Passive and ultimate slots of a hero
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroAbilities {
    #[serde(default)]
    pub passive: Option<AbilityRef>,
    #[serde(default)]
    pub ultimate: Option<AbilityRef>,
}

/// Read-only hero template from the hero catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub stats: BaseStats,
    #[serde(default)]
    pub abilities: HeroAbilities,
}

impl HeroTemplate {
    /// Create a template with no special moves
    pub fn new(id: impl Into<String>, name: impl Into<String>, stats: BaseStats) -> Self {
        HeroTemplate {
            id: id.into(),
            name: name.into(),
            avatar: String::new(),
            stats,
            abilities: HeroAbilities::default(),
        }
    }

    /// Set the passive ability
    pub fn with_passive(mut self, name: impl Into<String>) -> Self {
        self.abilities.passive = Some(AbilityRef::new(name));
        self
    }

    /// Set the ultimate ability
    pub fn with_ultimate(mut self, name: impl Into<String>) -> Self {
        self.abilities.ultimate = Some(AbilityRef::new(name));
        self
    }
}

/// A purchased ability: one effect key plus its magnitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDescriptor {
    pub name: String,
    /// Effect registry key
    pub effect: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_tier")]
    pub tier: u32,
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    #[serde(default = "default_stacks")]
    pub max_stacks: u32,
}

fn default_tier() -> u32 {
    1
}

fn default_stacks() -> u32 {
    1
}

impl AbilityDescriptor {
    pub fn new(name: impl Into<String>, effect: impl Into<String>, value: f64) -> Self {
        AbilityDescriptor {
            name: name.into(),
            effect: effect.into(),
            value,
            emoji: String::new(),
            description: String::new(),
            tier: default_tier(),
            stacks: default_stacks(),
            max_stacks: default_stacks(),
        }
    }
}

/// A piece of equipment with a map of named modifiers
///
/// Numeric entries feed the stats calculator; object entries describe
/// behaviours (cooldowns, procs, thresholds). Anything unrecognised is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: BTreeMap<String, serde_json::Value>,
}

impl EquipmentItem {
    pub fn new(item_type: impl Into<String>, name: impl Into<String>) -> Self {
        EquipmentItem {
            item_type: item_type.into(),
            name: name.into(),
            emoji: String::new(),
            description: String::new(),
            effects: BTreeMap::new(),
        }
    }

    /// Add a modifier entry
    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.effects.insert(key.into(), value.into());
        self
    }

    /// Numeric modifiers only
    pub fn numeric_effects(&self) -> impl Iterator<Item = (&str, f64)> {
        self.effects
            .iter()
            .filter_map(|(key, value)| value.as_f64().map(|v| (key.as_str(), v)))
    }

    /// True when a boolean modifier is present and set
    pub fn flag(&self, key: &str) -> bool {
        self.effects.get(key).and_then(serde_json::Value::as_bool).unwrap_or(false)
    }
}
