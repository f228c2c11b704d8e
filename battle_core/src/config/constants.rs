//! Combat constants configuration

use serde::{Deserialize, Serialize};

/// Tunable combat constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub timing: TimingConstants,
    #[serde(default)]
    pub mana: ManaConstants,
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub diminishing_returns: DiminishingReturnsConstants,
    #[serde(default)]
    pub stacks: StackConstants,
    #[serde(default)]
    pub escalation: EscalationConstants,
    #[serde(default)]
    pub abilities: AbilityConstants,
}

/// Scheduler cadence, all values in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConstants {
    /// Base game loop tick
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Fastest allowed attack interval
    #[serde(default = "default_attack_floor")]
    pub attack_interval_floor_ms: f64,
    #[serde(default = "default_mana_interval")]
    pub mana_interval_ms: u64,
    #[serde(default = "default_status_interval")]
    pub status_interval_ms: u64,
    #[serde(default = "default_enhanced_interval")]
    pub enhanced_interval_ms: u64,
    #[serde(default = "default_hp_loss_interval")]
    pub hp_loss_interval_ms: u64,
    #[serde(default = "default_drums_interval")]
    pub drums_interval_ms: u64,
    #[serde(default = "default_frost_nova_interval")]
    pub frost_nova_interval_ms: u64,
    #[serde(default = "default_shield_loss_interval")]
    pub shield_loss_interval_ms: u64,
    #[serde(default = "default_frostbite_interval")]
    pub frostbite_interval_ms: u64,
    /// How long a frostbite window keeps ticking after battle start
    #[serde(default = "default_frostbite_duration")]
    pub frostbite_duration_ms: u64,
    #[serde(default = "default_equipment_interval")]
    pub equipment_interval_ms: u64,
    /// Delay between the battle ending and the end notification
    #[serde(default = "default_battle_end_delay")]
    pub battle_end_delay_ms: u64,
}

impl Default for TimingConstants {
    fn default() -> Self {
        TimingConstants {
            tick_rate_ms: default_tick_rate(),
            attack_interval_floor_ms: default_attack_floor(),
            mana_interval_ms: default_mana_interval(),
            status_interval_ms: default_status_interval(),
            enhanced_interval_ms: default_enhanced_interval(),
            hp_loss_interval_ms: default_hp_loss_interval(),
            drums_interval_ms: default_drums_interval(),
            frost_nova_interval_ms: default_frost_nova_interval(),
            shield_loss_interval_ms: default_shield_loss_interval(),
            frostbite_interval_ms: default_frostbite_interval(),
            frostbite_duration_ms: default_frostbite_duration(),
            equipment_interval_ms: default_equipment_interval(),
            battle_end_delay_ms: default_battle_end_delay(),
        }
    }
}

fn default_tick_rate() -> u64 {
    50
}
fn default_attack_floor() -> f64 {
    250.0
}
fn default_mana_interval() -> u64 {
    250
}
fn default_status_interval() -> u64 {
    1000
}
fn default_enhanced_interval() -> u64 {
    800
}
fn default_hp_loss_interval() -> u64 {
    1500
}
fn default_drums_interval() -> u64 {
    2000
}
fn default_frost_nova_interval() -> u64 {
    2000
}
fn default_shield_loss_interval() -> u64 {
    1800
}
fn default_frostbite_interval() -> u64 {
    800
}
fn default_frostbite_duration() -> u64 {
    5000
}
fn default_equipment_interval() -> u64 {
    1000
}
fn default_battle_end_delay() -> u64 {
    3000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManaConstants {
    /// Mana needed to cast an ultimate
    #[serde(default = "default_max_mana")]
    pub max_mana: f64,
    /// Mana gained per second before bonuses
    #[serde(default = "default_base_regen")]
    pub base_regen_per_sec: f64,
}

impl Default for ManaConstants {
    fn default() -> Self {
        ManaConstants {
            max_mana: default_max_mana(),
            base_regen_per_sec: default_base_regen(),
        }
    }
}

fn default_max_mana() -> f64 {
    100.0
}
fn default_base_regen() -> f64 {
    11.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Committed hits above this fire `high_damage_taken`
    #[serde(default = "default_high_damage_threshold")]
    pub high_damage_threshold: f64,
    /// Fraction of remaining shield stacks kept after absorbing a hit
    #[serde(default = "default_shield_decay")]
    pub shield_decay_on_hit: f64,
    /// Every damage calculation returns at least this much
    #[serde(default = "default_min_damage")]
    pub min_damage: f64,
    /// Percentage reduction is clamped to this value
    #[serde(default = "default_max_reduction")]
    pub max_reduction: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            high_damage_threshold: default_high_damage_threshold(),
            shield_decay_on_hit: default_shield_decay(),
            min_damage: default_min_damage(),
            max_reduction: default_max_reduction(),
        }
    }
}

fn default_high_damage_threshold() -> f64 {
    80.0
}
fn default_shield_decay() -> f64 {
    0.7
}
fn default_min_damage() -> f64 {
    1.0
}
fn default_max_reduction() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritConstants {
    /// Critical multiplier used when a hero has none (1.5 = 150%)
    #[serde(default = "default_base_multiplier")]
    pub base_multiplier: f64,
    /// Additive crit chance granted by a passive precision strike
    #[serde(default = "default_passive_bonus")]
    pub passive_bonus: f64,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            base_multiplier: default_base_multiplier(),
            passive_bonus: default_passive_bonus(),
        }
    }
}

fn default_base_multiplier() -> f64 {
    1.5
}
fn default_passive_bonus() -> f64 {
    0.15
}

/// One diminishing-returns curve: linear up to `threshold`, then `factor` per point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConstants {
    pub threshold: f64,
    pub factor: f64,
}

impl CurveConstants {
    /// `v` when `v <= threshold`, else `threshold + (v - threshold) * factor`
    pub fn apply(&self, value: f64) -> f64 {
        if value <= self.threshold {
            value
        } else {
            self.threshold + (value - self.threshold) * self.factor
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiminishingReturnsConstants {
    #[serde(default = "default_attack_curve")]
    pub attack: CurveConstants,
    #[serde(default = "default_armor_curve")]
    pub armor: CurveConstants,
    #[serde(default = "default_speed_curve")]
    pub speed: CurveConstants,
    /// Effective speed never drops below this many attacks per second
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,
}

impl Default for DiminishingReturnsConstants {
    fn default() -> Self {
        DiminishingReturnsConstants {
            attack: default_attack_curve(),
            armor: default_armor_curve(),
            speed: default_speed_curve(),
            min_speed: default_min_speed(),
        }
    }
}

fn default_attack_curve() -> CurveConstants {
    CurveConstants {
        threshold: 100.0,
        factor: 0.6,
    }
}
fn default_armor_curve() -> CurveConstants {
    CurveConstants {
        threshold: 100.0,
        factor: 0.6,
    }
}
fn default_speed_curve() -> CurveConstants {
    CurveConstants {
        threshold: 2.0,
        factor: 0.6,
    }
}
fn default_min_speed() -> f64 {
    0.1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackConstants {
    /// Fraction of poison/frost stacks kept after each status tick
    #[serde(default = "default_stack_decay")]
    pub decay: f64,
}

impl Default for StackConstants {
    fn default() -> Self {
        StackConstants {
            decay: default_stack_decay(),
        }
    }
}

fn default_stack_decay() -> f64 {
    0.7
}

/// Late-round damage escalation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConstants {
    /// Seconds elapsed before escalation kicks in
    #[serde(default = "default_escalation_start")]
    pub start_secs: f64,
    /// Added to the multiplier per second past the start
    #[serde(default = "default_escalation_rate")]
    pub rate_per_sec: f64,
}

impl Default for EscalationConstants {
    fn default() -> Self {
        EscalationConstants {
            start_secs: default_escalation_start(),
            rate_per_sec: default_escalation_rate(),
        }
    }
}

fn default_escalation_start() -> f64 {
    20.0
}
fn default_escalation_rate() -> f64 {
    0.06
}

impl EscalationConstants {
    /// Damage multiplier after `seconds_elapsed` seconds of a round
    pub fn multiplier(&self, seconds_elapsed: f64) -> f64 {
        if seconds_elapsed >= self.start_secs {
            1.0 + self.rate_per_sec * (seconds_elapsed - self.start_secs)
        } else {
            1.0
        }
    }
}

/// Health thresholds (fractions of max) and proc chances used by abilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityConstants {
    /// Chance for an on-attack hook to react
    #[serde(default = "default_on_attack_chance")]
    pub on_attack_chance: f64,
    /// Chance for an on-heal hook to react
    #[serde(default = "default_on_heal_chance")]
    pub on_heal_chance: f64,
    /// Healing needed per heal-threshold burst
    #[serde(default = "default_heal_threshold")]
    pub heal_threshold: f64,
    #[serde(default = "default_low_hp_heal_double_below")]
    pub low_hp_heal_double_below: f64,
    /// How long healing stays doubled once the low-HP window opens
    #[serde(default = "default_heal_double_window")]
    pub heal_double_window_ms: u64,
    #[serde(default = "default_cold_embrace_below")]
    pub cold_embrace_below: f64,
    #[serde(default = "default_low_hp_poison_below")]
    pub low_hp_poison_below: f64,
    /// Berserker enrages at or below this
    #[serde(default = "default_berserker_below")]
    pub berserker_below: f64,
    /// Death Coil heals instead of striking below this
    #[serde(default = "default_death_coil_below")]
    pub death_coil_below: f64,
    #[serde(default = "default_warrior_training_below")]
    pub warrior_training_below: f64,
    #[serde(default = "default_eagle_eye_chance")]
    pub eagle_eye_chance: f64,
    #[serde(default = "default_shadow_step_chance")]
    pub shadow_step_chance: f64,
    #[serde(default = "default_divine_blessing_below")]
    pub divine_blessing_below: f64,
}

impl Default for AbilityConstants {
    fn default() -> Self {
        AbilityConstants {
            on_attack_chance: default_on_attack_chance(),
            on_heal_chance: default_on_heal_chance(),
            heal_threshold: default_heal_threshold(),
            low_hp_heal_double_below: default_low_hp_heal_double_below(),
            heal_double_window_ms: default_heal_double_window(),
            cold_embrace_below: default_cold_embrace_below(),
            low_hp_poison_below: default_low_hp_poison_below(),
            berserker_below: default_berserker_below(),
            death_coil_below: default_death_coil_below(),
            warrior_training_below: default_warrior_training_below(),
            eagle_eye_chance: default_eagle_eye_chance(),
            shadow_step_chance: default_shadow_step_chance(),
            divine_blessing_below: default_divine_blessing_below(),
        }
    }
}

fn default_on_attack_chance() -> f64 {
    0.6
}
fn default_on_heal_chance() -> f64 {
    0.35
}
fn default_heal_threshold() -> f64 {
    400.0
}
fn default_low_hp_heal_double_below() -> f64 {
    0.2
}
fn default_heal_double_window() -> u64 {
    5000
}
fn default_cold_embrace_below() -> f64 {
    0.25
}
fn default_low_hp_poison_below() -> f64 {
    0.4
}
fn default_berserker_below() -> f64 {
    0.3
}
fn default_death_coil_below() -> f64 {
    0.5
}
fn default_warrior_training_below() -> f64 {
    0.5
}
fn default_eagle_eye_chance() -> f64 {
    0.15
}
fn default_shadow_step_chance() -> f64 {
    0.1
}
fn default_divine_blessing_below() -> f64 {
    0.3
}
