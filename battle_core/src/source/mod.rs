//! StatSource - Trait and implementations for stat providers

mod base_stats;
mod equipment;

pub use base_stats::BaseStatsSource;
pub use equipment::EquipmentSource;

use crate::stat_block::StatAccumulator;

/// Trait for anything that contributes stats to an effective stats block
///
/// Sources may only add to the accumulator (flat, scale, counter, flag),
/// so any permutation of sources folds to the same result.
pub trait StatSource: Send + Sync {
    /// Unique identifier for this source
    fn id(&self) -> &str;

    /// Priority for application order (higher = applied later)
    /// Default priority is 0.
    /// Suggested priorities:
    /// - Base stats: -100
    /// - Purchased abilities: 0
    /// - Equipment: 100
    fn priority(&self) -> i32 {
        0
    }

    /// Apply this source's stats to the accumulator
    fn apply(&self, stats: &mut StatAccumulator);
}
