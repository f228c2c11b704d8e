//! Scratch state for equipment-driven one-shot flags and cooldowns

use serde::{Deserialize, Serialize};

/// Temporary change to mana regeneration (per second)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManaRegenDebuff {
    pub delta: f64,
    /// Battle time (ms) after which the debuff stops counting
    #[serde(default)]
    pub until_ms: Option<u64>,
}

/// Attacker-side reduction of outgoing damage, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageOutputReduction {
    #[serde(default)]
    pub phys: f64,
    #[serde(default)]
    pub magic: f64,
    /// Battle time (ms) at which the reduction lapses; never when unset
    #[serde(default)]
    pub until_ms: Option<u64>,
}

impl DamageOutputReduction {
    /// Whether the reduction still applies at `now_ms`
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.until_ms.map_or(true, |until| until > now_ms)
    }
}

/// Mutable per-battle equipment scratch space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentState {
    /// Next attack is a guaranteed critical hit
    pub force_crit: bool,
    /// Next attack cannot be evaded
    pub force_no_evasion: bool,
    /// Next incoming attack is evaded automatically
    pub auto_evade_ready: bool,
    /// Percent chance for incoming attacks to miss
    pub enemy_miss_chance_bonus_pct: f64,
    /// Bonus magic damage dealt by the next hit
    pub on_hit_bonus_magic: f64,
    /// Flat reduction of the next incoming hit
    pub reduce_incoming_flat: f64,
    pub mana_regen_debuffs: Vec<ManaRegenDebuff>,
    pub damage_output_reduction: Option<DamageOutputReduction>,
}

impl EquipmentState {
    /// Sum of mana regen debuffs still active at `now_ms`
    pub fn mana_regen_delta(&self, now_ms: u64) -> f64 {
        self.mana_regen_debuffs
            .iter()
            .filter(|d| d.until_ms.map_or(true, |until| until > now_ms))
            .map(|d| d.delta)
            .sum()
    }

    /// Drop debuffs that have lapsed
    pub fn prune_expired(&mut self, now_ms: u64) {
        self.mana_regen_debuffs
            .retain(|d| d.until_ms.map_or(true, |until| until > now_ms));
    }

    /// Read and clear the force-no-evasion flag
    pub fn take_force_no_evasion(&mut self) -> bool {
        std::mem::take(&mut self.force_no_evasion)
    }

    /// Read and clear the auto-evade flag
    pub fn take_auto_evade(&mut self) -> bool {
        std::mem::take(&mut self.auto_evade_ready)
    }

    /// Read and clear the forced crit flag
    pub fn take_force_crit(&mut self) -> bool {
        std::mem::take(&mut self.force_crit)
    }

    /// Read and clear the pending bonus magic damage
    pub fn take_on_hit_bonus_magic(&mut self) -> f64 {
        std::mem::take(&mut self.on_hit_bonus_magic)
    }

    /// Read and clear the pending flat reduction
    pub fn take_reduce_incoming_flat(&mut self) -> f64 {
        std::mem::take(&mut self.reduce_incoming_flat)
    }
}
