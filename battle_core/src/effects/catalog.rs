//! Built-in effect keys

use super::EffectCategory::{self, *};
use super::StatTransform::{self, *};
use crate::types::Stat;

/// Every effect key the shop catalog can produce
pub(super) const DEFAULT_EFFECTS: &[(&str, EffectCategory, StatTransform)] = &[
    // === Combat ===
    ("attack_boost", Combat, Flat(Stat::Attack)),
    ("base_damage_boost", Combat, Flat(Stat::Attack)),
    ("stat_boost", Combat, StatBoost),
    ("crit_multiplier", Combat, Percent(Stat::CritDamage)),
    ("crit_chance", Combat, Percent(Stat::CritChance)),
    ("physical_amp", Combat, Percent(Stat::PhysicalDamageAmplification)),
    ("magic_amp", Combat, Percent(Stat::MagicDamageAmplification)),
    ("crit_attack_boost", Combat, Counter("critAttackBoost")),
    ("attack_damage_increase", Combat, Rate("attackDamageIncrease")),
    ("relentless_strike", Combat, Rate("relentlessStrike")),
    ("battle_trance", Combat, Rate("battleTrance")),
    ("weapon_mastery", Combat, Rate("weaponMastery")),
    ("berserker_focus", Combat, Counter("berserkerFocus")),
    ("crushing_blow", Combat, Rate("crushingBlow")),
    ("battle_fury", Combat, Rate("battleFury")),
    ("base_crit_boost", Combat, Percent(Stat::CritChance)),
    ("crit_hp_boost", Combat, Counter("critHpBoost")),
    ("magic_crit", Combat, Rate("magicCrit")),
    ("greater_bash", Combat, Counter("greaterBash")),
    ("source_detonation", Combat, Rate("sourceDetonation")),
    ("coup_de_grace", Combat, Rate("coupDeGrace")),
    ("blade_dance", Combat, Rate("bladeDance")),
    ("blood_strike", Combat, Rate("bloodStrike")),
    ("crit_chance_boost", Combat, Percent(Stat::CritChance)),
    ("crit_bonus_damage", Combat, Rate("critBonusDamage")),
    ("crit_temp_hp", Combat, Counter("critTempHp")),
    // === Defense ===
    ("health_boost", Defense, Flat(Stat::Health)),
    ("health_boost_flat", Defense, Flat(Stat::Health)),
    ("armor_boost", Defense, Flat(Stat::Armor)),
    ("health_percentage_boost", Defense, Scale(&[Stat::Health])),
    ("health_percentage_boost_major", Defense, Scale(&[Stat::Health])),
    ("evasion_chance", Defense, Percent(Stat::EvasionChance)),
    ("magic_resist", Defense, Percent(Stat::MagicDamageReduction)),
    ("damage_immunity", Defense, Rate("damageImmunityChance")),
    ("block_chance", Defense, Rate("blockChance")),
    ("evasion_attack_damage", Defense, Rate("evasionAttackDamage")),
    ("base_evasion_boost", Defense, Percent(Stat::EvasionChance)),
    ("ignore_evade", Defense, Rate("ignoreEvade")),
    ("evade_crit_damage", Defense, Rate("evadeCritDamage")),
    ("magic_evasion", Defense, Rate("magicEvasion")),
    ("evade_counter", Defense, Rate("evadeCounter")),
    ("windrun", Defense, Counter("windrun")),
    ("mischief", Defense, Rate("mischief")),
    ("dispersion", Defense, Rate("dispersion")),
    ("holy_reflection", Defense, Rate("holyReflection")),
    ("crit_resistance", Defense, Rate("critResistance")),
    ("armor_pierce_chance", Defense, Rate("armorPierceChance")),
    ("evasion_attack_bonus", Defense, Rate("evasionAttackBonus")),
    ("crit_armor_pierce", Defense, Rate("critArmorPierce")),
    ("evasion_boost", Defense, Percent(Stat::EvasionChance)),
    ("evasion_damage_reduction", Defense, Percent(Stat::EvasionDamageReduction)),
    ("evade_crit_boost", Defense, Rate("evadeCritBoost")),
    ("evade_damage_reflect", Defense, Rate("evadeDamageReflect")),
    ("evade_reflect", Defense, Rate("evadeReflect")),
    ("ignore_enemy_evade", Defense, Rate("ignoreEnemyEvade")),
    ("magic_evade", Defense, Rate("magicEvade")),
    ("damage_block_chance", Defense, Rate("damageBlockChance")),
    ("damage_reduction", Defense, Rate("damageReduction")),
    // === Resource ===
    ("mana_regen", Resource, Percent(Stat::ManaRegeneration)),
    ("gold_bonus", Resource, Rate("goldBonus")),
    ("attack_heal_chance", Resource, Rate("attackHealChance")),
    ("attack_mana_restore", Resource, Rate("attackManaRestore")),
    ("evade_mana", Resource, Counter("evadeManaRestore")),
    ("evade_heal", Resource, Counter("evadeHealAmount")),
    ("crit_heal", Resource, Counter("critHealAmount")),
    ("crit_mana", Resource, Counter("critManaRestore")),
    ("health_sect_reduction", Resource, Rate("healthSectReduction")),
    ("health_regen_percent", Resource, Rate("healthRegenPercent")),
    ("health_regen_flat", Resource, Counter("healthRegenFlat")),
    ("opponent_heal_resist", Resource, Rate("opponentHealResist")),
    ("ultimate_heal", Resource, Counter("ultimateHeal")),
    ("heal_damage_chance", Resource, Rate("healDamageChance")),
    ("enhanced_regen", Resource, Counter("enhancedRegen")),
    ("heal_to_attack_boost", Resource, Rate("healToAttackBoost")),
    ("attack_heal", Resource, Counter("attackHealAmount")),
    ("attack_mana", Resource, Counter("attackManaAmount")),
    ("crit_gold_bonus", Resource, Counter("critGoldBonus")),
    ("crit_lifesteal", Resource, Rate("critLifesteal")),
    ("damage_to_heal", Resource, Rate("damageToHeal")),
    ("health_armor_bonus", Resource, Rate("healthArmorBonus")),
    ("health_on_crit", Resource, Counter("healthOnCrit")),
    ("health_status_resist", Resource, Rate("healthStatusResist")),
    // === Status ===
    ("attack_poison_chance", Status, Rate("attackPoisonChance")),
    ("attack_frost_chance", Status, Rate("attackFrostChance")),
    ("attack_shield_chance", Status, Rate("attackShieldChance")),
    ("bleeding_chance", Status, Rate("bleedingChance")),
    ("evade_poison", Status, Counter("evadePoisonStacks")),
    ("evade_frost", Status, Counter("evadeFrostStacks")),
    ("evade_shield", Status, Counter("evadeShieldStacks")),
    ("crit_poison", Status, Counter("critPoisonStacks")),
    ("crit_frost", Status, Counter("critFrostStacks")),
    ("crit_shield", Status, Counter("critShieldStacks")),
    ("heal_poison_chance", Status, Rate("healPoisonChance")),
    ("heal_frost_chance", Status, Rate("healFrostChance")),
    ("heal_shield_chance", Status, Rate("healShieldChance")),
    ("heal_to_damage_aura", Status, Rate("healToDamageAura")),
    ("poison_aura", Status, Counter("poisonAura")),
    ("poison_resistance", Status, Rate("poisonResistance")),
    ("ultimate_poison", Status, Counter("ultimatePoison")),
    ("shield_poison_chance", Status, Rate("shieldPoisonChance")),
    ("frost_poison_chance", Status, Rate("frostPoisonChance")),
    ("damage_poison_chance", Status, Rate("damagePoisonChance")),
    ("deal_damage_poison_chance", Status, Rate("dealDamagePoisonChance")),
    ("poison_decay_resist", Status, Rate("poisonDecayResist")),
    ("self_poison_reflect", Status, Counter("selfPoisonReflect")),
    ("frost_aura", Status, Counter("frostAura")),
    ("frost_resistance", Status, Rate("frostResistance")),
    ("ultimate_frost", Status, Counter("ultimateFrost")),
    ("shield_frost_chance", Status, Rate("shieldFrostChance")),
    ("frost_damage_chance", Status, Rate("frostDamageChance")),
    ("damage_frost_chance", Status, Rate("damageFrostChance")),
    ("frost_nova_damage", Status, Counter("frostNovaDamage")),
    ("frostbite_stun", Status, Counter("frostbiteStun")),
    ("shield_aura", Status, Counter("shieldAura")),
    ("shield_resistance", Status, Rate("shieldResistance")),
    ("ultimate_shield", Status, Counter("ultimateShield")),
    ("shield_damage_chance", Status, Rate("shieldDamageChance")),
    ("status_shield_cleanse", Status, Rate("statusShieldCleanse")),
    ("shield_loss_damage", Status, Rate("shieldLossDamage")),
    ("attack_bleed", Status, Rate("attackBleedChance")),
    ("attack_poison", Status, Counter("attackPoisonStacks")),
    ("attack_frost", Status, Counter("attackFrostStacks")),
    ("attack_shield", Status, Counter("attackShieldStacks")),
    ("aura_heal_nearby", Status, Counter("auraHealNearby")),
    ("crit_ignore_shield", Status, Rate("critIgnoreShield")),
    ("crit_poison_chance", Status, Rate("critPoisonChance")),
    ("poison_on_evade", Status, Counter("poisonOnEvade")),
    ("damage_poison_reflect", Status, Counter("damagePoisonReflect")),
    ("hp_damage_aura", Status, Rate("hpDamageAura")),
    // === Tactical ===
    ("speed_boost", Tactical, Flat(Stat::Speed)),
    ("ultimate_power", Tactical, Scale(&[Stat::Attack, Stat::Health, Stat::Speed, Stat::Armor])),
    ("attack_speed", Tactical, Percent(Stat::AttackSpeed)),
    ("counter_chance", Tactical, Rate("counterChance")),
    ("ability_cooldown", Tactical, Rate("abilityCooldownReduction")),
    ("attack_speed_increase", Tactical, Counter("attackSpeedIncrease")),
    ("counter_attack", Tactical, Rate("counterAttack")),
    ("press_attack", Tactical, Rate("pressAttack")),
    ("attack_speed_boost", Tactical, Rate("attackSpeedBoost")),
    ("consecutive_attack_boost", Tactical, Rate("consecutiveAttackBoost")),
    ("stacking_attack_boost", Tactical, Rate("stackingAttackBoost")),
    ("stacking_attack_speed", Tactical, Counter("stackingAttackSpeed")),
    ("double_attack_chance", Tactical, Rate("doubleAttackChance")),
    ("damage_counter", Tactical, Rate("damageCounterChance")),
    ("crit_chain_bonus", Tactical, Rate("critChainBonus")),
    // === Conditional ===
    ("vendetta", Conditional, Flag("vendetta")),
    ("low_health_damage", Conditional, Rate("lowHealthDamageBonus")),
    ("death_save", Conditional, Flat(Stat::DeathSaveCharges)),
    ("hp_loss_poison", Conditional, Rate("hpLossPoisonRate")),
    ("hp_loss_frost", Conditional, Rate("hpLossFrostRate")),
    ("hp_loss_shield", Conditional, Rate("hpLossShieldRate")),
    ("unyielding_spirit", Conditional, Rate("unyieldingSpirit")),
    ("life_break", Conditional, Rate("lifeBreak")),
    ("drums_of_slom", Conditional, Rate("drumsOfSlom")),
    ("heal_threshold_damage", Conditional, Counter("healThresholdDamage")),
    ("low_hp_heal_double", Conditional, Rate("lowHpHealDouble")),
    ("battle_start_poison", Conditional, Counter("battleStartPoison")),
    ("low_hp_poison_burst", Conditional, Counter("lowHpPoisonBurst")),
    ("battle_start_frost", Conditional, Counter("battleStartFrost")),
    ("cold_embrace_defense", Conditional, Rate("coldEmbraceDefense")),
    ("battle_start_shield", Conditional, Counter("battleStartShield")),
    ("high_damage_shield", Conditional, Counter("highDamageShield")),
    ("death_immunity_shield", Conditional, Counter("deathImmunityShield")),
    ("kill_attack_boost", Conditional, Counter("killAttackBoost")),
    ("death_revive", Conditional, Rate("deathReviveHealth")),
    ("low_health_lifesteal", Conditional, Rate("lowHealthLifesteal")),
    ("battle_start_evasion", Conditional, Counter("battleStartEvasion")),
    ("crit_battle_start", Conditional, Counter("critBattleStart")),
    ("health_death_immunity", Conditional, Rate("healthDeathImmunity")),
    ("health_on_kill", Conditional, Counter("healthOnKill")),
    ("low_health_regen", Conditional, Counter("lowHealthRegen")),
    ("low_hp_regen_boost", Conditional, Rate("lowHpRegenBoost")),
    ("hp_loss_damage_reduction", Conditional, Rate("hpLossDamageReduction")),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let mut seen = HashSet::new();
        for (key, _, _) in DEFAULT_EFFECTS {
            assert!(seen.insert(*key), "duplicate effect key {}", key);
        }
    }
}
