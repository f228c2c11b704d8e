//! Status effects - stack-based and timed effects carried by a hero

pub mod tick;

pub use tick::{process_status_effects, StatusEvent, StatusTickResult};

use serde::{Deserialize, Serialize};

/// Stack-based status families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackKind {
    Poison,
    Frost,
    Shield,
}

impl StackKind {
    pub fn name(self) -> &'static str {
        match self {
            StackKind::Poison => "poison",
            StackKind::Frost => "frost",
            StackKind::Shield => "shield",
        }
    }
}

/// One active status effect
///
/// Stack effects decay or convert to damage on each status tick; timed
/// effects count `ticks_remaining` down and expire at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEffect {
    PoisonStacks { stacks: u32 },
    FrostStacks { stacks: u32 },
    ShieldStacks { stacks: u32 },
    Burn { damage: f64, ticks_remaining: u32 },
    Poison { damage: f64, ticks_remaining: u32 },
    Stun { ticks_remaining: u32 },
    DamageReduction { reduction: f64, ticks_remaining: u32 },
    AttackSpeed { bonus: f64, ticks_remaining: u32 },
    Absorption { count: u32, ticks_remaining: u32 },
    Dodge { chance: f64, ticks_remaining: u32 },
    Stealth { attack_multiplier: f64, ticks_remaining: u32 },
    PoisonBlade {
        poison_percent: f64,
        poison_duration: u32,
        ticks_remaining: u32,
    },
    Immunity { ticks_remaining: u32 },
    Skeleton { attack_percent: f64, ticks_remaining: u32 },
}

impl StatusEffect {
    /// Stack effect of the given family
    pub fn stacks_of(kind: StackKind, stacks: u32) -> Self {
        match kind {
            StackKind::Poison => StatusEffect::PoisonStacks { stacks },
            StackKind::Frost => StatusEffect::FrostStacks { stacks },
            StackKind::Shield => StatusEffect::ShieldStacks { stacks },
        }
    }

    /// Wire name of this effect type
    pub fn type_name(&self) -> &'static str {
        match self {
            StatusEffect::PoisonStacks { .. } => "poison_stacks",
            StatusEffect::FrostStacks { .. } => "frost_stacks",
            StatusEffect::ShieldStacks { .. } => "shield_stacks",
            StatusEffect::Burn { .. } => "burn",
            StatusEffect::Poison { .. } => "poison",
            StatusEffect::Stun { .. } => "stun",
            StatusEffect::DamageReduction { .. } => "damage_reduction",
            StatusEffect::AttackSpeed { .. } => "attack_speed",
            StatusEffect::Absorption { .. } => "absorption",
            StatusEffect::Dodge { .. } => "dodge",
            StatusEffect::Stealth { .. } => "stealth",
            StatusEffect::PoisonBlade { .. } => "poison_blade",
            StatusEffect::Immunity { .. } => "immunity",
            StatusEffect::Skeleton { .. } => "skeleton",
        }
    }

    /// Stack family and count, for stack effects
    pub fn stack_kind(&self) -> Option<(StackKind, u32)> {
        match *self {
            StatusEffect::PoisonStacks { stacks } => Some((StackKind::Poison, stacks)),
            StatusEffect::FrostStacks { stacks } => Some((StackKind::Frost, stacks)),
            StatusEffect::ShieldStacks { stacks } => Some((StackKind::Shield, stacks)),
            _ => None,
        }
    }

    fn stacks_mut(&mut self) -> Option<&mut u32> {
        match self {
            StatusEffect::PoisonStacks { stacks }
            | StatusEffect::FrostStacks { stacks }
            | StatusEffect::ShieldStacks { stacks } => Some(stacks),
            _ => None,
        }
    }

    /// Remaining ticks, for timed effects
    pub fn ticks_remaining(&self) -> Option<u32> {
        match *self {
            StatusEffect::PoisonStacks { .. }
            | StatusEffect::FrostStacks { .. }
            | StatusEffect::ShieldStacks { .. } => None,
            StatusEffect::Burn { ticks_remaining, .. }
            | StatusEffect::Poison { ticks_remaining, .. }
            | StatusEffect::Stun { ticks_remaining }
            | StatusEffect::DamageReduction { ticks_remaining, .. }
            | StatusEffect::AttackSpeed { ticks_remaining, .. }
            | StatusEffect::Absorption { ticks_remaining, .. }
            | StatusEffect::Dodge { ticks_remaining, .. }
            | StatusEffect::Stealth { ticks_remaining, .. }
            | StatusEffect::PoisonBlade { ticks_remaining, .. }
            | StatusEffect::Immunity { ticks_remaining }
            | StatusEffect::Skeleton { ticks_remaining, .. } => Some(ticks_remaining),
        }
    }

    pub(crate) fn ticks_remaining_mut(&mut self) -> Option<&mut u32> {
        match self {
            StatusEffect::PoisonStacks { .. }
            | StatusEffect::FrostStacks { .. }
            | StatusEffect::ShieldStacks { .. } => None,
            StatusEffect::Burn { ticks_remaining, .. }
            | StatusEffect::Poison { ticks_remaining, .. }
            | StatusEffect::Stun { ticks_remaining }
            | StatusEffect::DamageReduction { ticks_remaining, .. }
            | StatusEffect::AttackSpeed { ticks_remaining, .. }
            | StatusEffect::Absorption { ticks_remaining, .. }
            | StatusEffect::Dodge { ticks_remaining, .. }
            | StatusEffect::Stealth { ticks_remaining, .. }
            | StatusEffect::PoisonBlade { ticks_remaining, .. }
            | StatusEffect::Immunity { ticks_remaining }
            | StatusEffect::Skeleton { ticks_remaining, .. } => Some(ticks_remaining),
        }
    }

    /// Short label for renderers, e.g. `poison x12` or `burn (2)`
    pub fn label(&self) -> String {
        match (self.stack_kind(), self.ticks_remaining()) {
            (Some((kind, stacks)), _) => format!("{} x{}", kind.name(), stacks),
            (None, Some(ticks)) => format!("{} ({})", self.type_name(), ticks),
            (None, None) => self.type_name().to_string(),
        }
    }
}

/// Ordered collection of a hero's status effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stacks, merging into an existing entry of the same family
    pub fn add_stacks(&mut self, kind: StackKind, stacks: u32) {
        if stacks == 0 {
            return;
        }
        let existing = self
            .effects
            .iter_mut()
            .find(|e| matches!(e.stack_kind(), Some((k, _)) if k == kind));
        match existing.and_then(StatusEffect::stacks_mut) {
            Some(current) => *current = current.saturating_add(stacks),
            None => self.effects.push(StatusEffect::stacks_of(kind, stacks)),
        }
    }

    /// Current stacks of a family (0 when absent)
    pub fn stacks(&self, kind: StackKind) -> u32 {
        self.effects
            .iter()
            .find_map(|e| match e.stack_kind() {
                Some((k, stacks)) if k == kind => Some(stacks),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Overwrite the stacks of a family; zero removes the entry
    pub fn set_stacks(&mut self, kind: StackKind, stacks: u32) {
        if stacks == 0 {
            self.effects
                .retain(|e| !matches!(e.stack_kind(), Some((k, _)) if k == kind));
            return;
        }
        let existing = self
            .effects
            .iter_mut()
            .find(|e| matches!(e.stack_kind(), Some((k, _)) if k == kind));
        match existing.and_then(StatusEffect::stacks_mut) {
            Some(current) => *current = stacks,
            None => self.effects.push(StatusEffect::stacks_of(kind, stacks)),
        }
    }

    /// Append a timed effect
    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    /// Whether an effect with this wire name is present
    pub fn has(&self, type_name: &str) -> bool {
        self.effects.iter().any(|e| e.type_name() == type_name)
    }

    /// Bonuses of attack-speed effects that still have ticks left
    pub fn attack_speed_bonuses(&self) -> impl Iterator<Item = f64> + '_ {
        self.effects.iter().filter_map(|e| match *e {
            StatusEffect::AttackSpeed { bonus, ticks_remaining } if ticks_remaining > 0 => Some(bonus),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub(crate) fn take(&mut self) -> Vec<StatusEffect> {
        std::mem::take(&mut self.effects)
    }

    pub(crate) fn restore(&mut self, effects: Vec<StatusEffect>) {
        self.effects = effects;
    }
}

impl FromIterator<StatusEffect> for StatusEffects {
    fn from_iter<I: IntoIterator<Item = StatusEffect>>(iter: I) -> Self {
        StatusEffects {
            effects: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_stacks_merges() {
        let mut effects = StatusEffects::new();
        effects.add_stacks(StackKind::Poison, 4);
        effects.add_stacks(StackKind::Poison, 6);
        effects.add_stacks(StackKind::Shield, 3);

        assert_eq!(effects.len(), 2);
        assert_eq!(effects.stacks(StackKind::Poison), 10);
        assert_eq!(effects.stacks(StackKind::Shield), 3);
        assert_eq!(effects.stacks(StackKind::Frost), 0);
    }

    #[test]
    fn test_zero_stacks_never_create_an_entry() {
        let mut effects = StatusEffects::new();
        effects.add_stacks(StackKind::Frost, 0);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_set_stacks_zero_removes() {
        let mut effects = StatusEffects::new();
        effects.add_stacks(StackKind::Shield, 50);
        effects.set_stacks(StackKind::Shield, 14);
        assert_eq!(effects.stacks(StackKind::Shield), 14);

        effects.set_stacks(StackKind::Shield, 0);
        assert!(!effects.has("shield_stacks"));
    }

    #[test]
    fn test_attack_speed_bonuses_skip_expired() {
        let effects: StatusEffects = vec![
            StatusEffect::AttackSpeed { bonus: 0.5, ticks_remaining: 3 },
            StatusEffect::AttackSpeed { bonus: 0.2, ticks_remaining: 0 },
        ]
        .into_iter()
        .collect();

        let bonuses: Vec<f64> = effects.attack_speed_bonuses().collect();
        assert_eq!(bonuses, vec![0.5]);
    }

    #[test]
    fn test_serde_tagged_shape() {
        let json = serde_json::to_value(StatusEffect::Burn { damage: 12.0, ticks_remaining: 3 }).unwrap();
        assert_eq!(json["type"], "burn");
        assert_eq!(json["ticks_remaining"], 3);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StatusEffect::PoisonStacks { stacks: 12 }.label(), "poison x12");
        assert_eq!(StatusEffect::Stun { ticks_remaining: 1 }.label(), "stun (1)");
    }
}
