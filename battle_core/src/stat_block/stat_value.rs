//! StatValue - one stat's base, additive bonuses and percentage scales

use serde::{Deserialize, Serialize};

/// One stat while sources are being folded
///
/// Resolves to `(base + flat) × scale`, where `scale` is the running
/// product of every `1 + pct` applied. Flats always land before scales
/// regardless of the order sources report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub flat: f64,
    pub scale: f64,
    /// Number of percentage scales folded into `scale`
    pub scale_count: u32,
}

impl Default for StatValue {
    fn default() -> Self {
        StatValue {
            base: 0.0,
            flat: 0.0,
            scale: 1.0,
            scale_count: 0,
        }
    }
}

impl StatValue {
    pub fn from_base(base: f64) -> Self {
        StatValue {
            base,
            ..StatValue::default()
        }
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    /// Multiply by `1 + pct` (0.2 scales by ×1.2)
    pub fn add_scale(&mut self, pct: f64) {
        self.scale *= 1.0 + pct;
        self.scale_count += 1;
    }

    pub fn compute(&self) -> f64 {
        (self.base + self.flat) * self.scale
    }

    /// Whether any source touched this stat beyond its base
    pub fn is_modified(&self) -> bool {
        self.flat != 0.0 || self.scale_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_only() {
        let stat = StatValue::from_base(120.0);
        assert!((stat.compute() - 120.0).abs() < f64::EPSILON);
        assert!(!stat.is_modified());
    }

    #[test]
    fn test_flat_lands_before_scale() {
        // 20% max health scale reported before a +50 health flat: (100 + 50) × 1.2
        let mut stat = StatValue::from_base(100.0);
        stat.add_scale(0.20);
        stat.add_flat(50.0);
        assert!((stat.compute() - 180.0).abs() < 1e-9);
        assert!(stat.is_modified());
    }

    #[test]
    fn test_scales_compound() {
        let mut stat = StatValue::from_base(100.0);
        stat.add_scale(0.20);
        stat.add_scale(0.30);
        assert!((stat.compute() - 156.0).abs() < 1e-9);
        assert_eq!(stat.scale_count, 2);
    }

    #[test]
    fn test_negative_scale_shrinks() {
        let mut stat = StatValue::from_base(2.0);
        stat.add_scale(-0.25);
        assert!((stat.compute() - 1.5).abs() < 1e-12);
    }
}
