//! Trigger channels - the fixed combat moments abilities can hook into

use crate::types::DamageType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A combat moment, with whatever context that moment carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    BattleStart,
    OnAttack,
    OnCrit,
    /// The hook owner evaded an incoming attack
    OnEvade,
    OnDamageTaken { was_crit: bool, damage_type: DamageType },
    OnDamageDealt,
    OnHeal,
    HealThresholdCheck { heal_amount: f64 },
    HighDamageTaken { damage: f64 },
    LowHpCheck,
    /// Lethal damage is about to land; a hook returning true saves the owner
    DeathSave,
    OnUltimate,
    /// The owner's opponent just cast an ultimate
    OnEnemyUltimate,
    StatusTick,
    EnhancedTick,
    HpLossTick,
    DrumsTick,
    FrostNovaTick,
    ShieldLossTick,
    EquipmentTick,
}

/// Payload-free channel key of a [`Trigger`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    BattleStart,
    OnAttack,
    OnCrit,
    OnEvade,
    OnDamageTaken,
    OnDamageDealt,
    OnHeal,
    HealThresholdCheck,
    HighDamageTaken,
    LowHpCheck,
    DeathSave,
    OnUltimate,
    OnEnemyUltimate,
    StatusTick,
    EnhancedTick,
    HpLossTick,
    DrumsTick,
    FrostNovaTick,
    ShieldLossTick,
    EquipmentTick,
}

impl Trigger {
    pub fn kind(&self) -> TriggerKind {
        match self {
            Trigger::BattleStart => TriggerKind::BattleStart,
            Trigger::OnAttack => TriggerKind::OnAttack,
            Trigger::OnCrit => TriggerKind::OnCrit,
            Trigger::OnEvade => TriggerKind::OnEvade,
            Trigger::OnDamageTaken { .. } => TriggerKind::OnDamageTaken,
            Trigger::OnDamageDealt => TriggerKind::OnDamageDealt,
            Trigger::OnHeal => TriggerKind::OnHeal,
            Trigger::HealThresholdCheck { .. } => TriggerKind::HealThresholdCheck,
            Trigger::HighDamageTaken { .. } => TriggerKind::HighDamageTaken,
            Trigger::LowHpCheck => TriggerKind::LowHpCheck,
            Trigger::DeathSave => TriggerKind::DeathSave,
            Trigger::OnUltimate => TriggerKind::OnUltimate,
            Trigger::OnEnemyUltimate => TriggerKind::OnEnemyUltimate,
            Trigger::StatusTick => TriggerKind::StatusTick,
            Trigger::EnhancedTick => TriggerKind::EnhancedTick,
            Trigger::HpLossTick => TriggerKind::HpLossTick,
            Trigger::DrumsTick => TriggerKind::DrumsTick,
            Trigger::FrostNovaTick => TriggerKind::FrostNovaTick,
            Trigger::ShieldLossTick => TriggerKind::ShieldLossTick,
            Trigger::EquipmentTick => TriggerKind::EquipmentTick,
        }
    }
}

impl TriggerKind {
    /// Channel name as used in catalogs and diagnostics
    pub fn name(self) -> &'static str {
        match self {
            TriggerKind::BattleStart => "battle_start",
            TriggerKind::OnAttack => "on_attack",
            TriggerKind::OnCrit => "on_crit",
            TriggerKind::OnEvade => "on_evade",
            TriggerKind::OnDamageTaken => "on_damage_taken",
            TriggerKind::OnDamageDealt => "on_damage_dealt",
            TriggerKind::OnHeal => "on_heal",
            TriggerKind::HealThresholdCheck => "heal_threshold_check",
            TriggerKind::HighDamageTaken => "high_damage_taken",
            TriggerKind::LowHpCheck => "low_hp_check",
            TriggerKind::DeathSave => "death_save",
            TriggerKind::OnUltimate => "on_ultimate",
            TriggerKind::OnEnemyUltimate => "on_enemy_ultimate",
            TriggerKind::StatusTick => "status_tick",
            TriggerKind::EnhancedTick => "enhanced_tick",
            TriggerKind::HpLossTick => "hp_loss_tick",
            TriggerKind::DrumsTick => "drums_tick",
            TriggerKind::FrostNovaTick => "frost_nova_tick",
            TriggerKind::ShieldLossTick => "shield_loss_tick",
            TriggerKind::EquipmentTick => "equipment_tick",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_drops_payload() {
        let trigger = Trigger::OnDamageTaken {
            was_crit: true,
            damage_type: DamageType::Physical,
        };
        assert_eq!(trigger.kind(), TriggerKind::OnDamageTaken);
        assert_eq!(Trigger::HighDamageTaken { damage: 120.0 }.kind().name(), "high_damage_taken");
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&TriggerKind::ShieldLossTick).unwrap();
        assert_eq!(json, format!("\"{}\"", TriggerKind::ShieldLossTick));
    }
}
