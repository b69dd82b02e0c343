//! Final acceptance score: substance minus a duplicate penalty plus a
//! viral-potential bonus, checked against the acceptance threshold.

use newswire_common::Config;

/// Tuning for the final-score formula. The penalty and bonus shapes are
/// fixed; only the acceptance threshold comes from config.
#[derive(Debug, Clone, Copy)]
pub struct ScorePolicy {
    pub final_threshold: f32,
    base_penalty: f32,
    max_penalty: f32,
    penalty_band: (f32, f32),
    myth_threshold: f32,
    bonus_rate: f32,
    max_bonus: f32,
}

impl ScorePolicy {
    pub fn new(final_threshold: f32) -> Self {
        Self {
            final_threshold,
            base_penalty: 0.5,
            max_penalty: 2.0,
            penalty_band: (0.5, 0.8),
            myth_threshold: 5.0,
            bonus_rate: 0.4,
            max_bonus: 2.0,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.final_threshold)
    }

    /// Flat below the band, linear across it, capped above it. Even a
    /// low-coincidence item pays the base penalty: repetition is never free.
    pub fn duplicate_penalty(&self, coincide: f32) -> f32 {
        let (lo, hi) = self.penalty_band;
        if coincide <= lo {
            self.base_penalty
        } else if coincide >= hi {
            self.max_penalty
        } else {
            self.base_penalty + (coincide - lo) / (hi - lo) * (self.max_penalty - self.base_penalty)
        }
    }

    /// Zero below the myth threshold, then linear, capped.
    pub fn virality_bonus(&self, myth_score: f32) -> f32 {
        if myth_score < self.myth_threshold {
            0.0
        } else {
            ((myth_score - self.myth_threshold) * self.bonus_rate).min(self.max_bonus)
        }
    }

    pub fn final_score(&self, essence: f32, coincide: f32, myth_score: f32) -> f32 {
        essence - self.duplicate_penalty(coincide) + self.virality_bonus(myth_score)
    }

    pub fn passes(&self, final_score: f32) -> bool {
        final_score >= self.final_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ScorePolicy {
        ScorePolicy::new(6.0)
    }

    #[test]
    fn penalty_shape() {
        let p = policy();
        assert_eq!(p.duplicate_penalty(0.0), 0.5);
        assert_eq!(p.duplicate_penalty(0.5), 0.5);
        assert!((p.duplicate_penalty(0.65) - 1.25).abs() < 1e-6);
        assert_eq!(p.duplicate_penalty(0.8), 2.0);
        assert_eq!(p.duplicate_penalty(1.0), 2.0);
    }

    #[test]
    fn bonus_shape() {
        let p = policy();
        assert_eq!(p.virality_bonus(0.0), 0.0);
        assert_eq!(p.virality_bonus(4.9), 0.0);
        assert_eq!(p.virality_bonus(5.0), 0.0);
        assert!((p.virality_bonus(7.5) - 1.0).abs() < 1e-6);
        assert_eq!(p.virality_bonus(10.0), 2.0);
        assert_eq!(p.virality_bonus(100.0), 2.0);
    }

    #[test]
    fn near_duplicate_of_strong_item_pays_full_penalty() {
        let p = policy();
        let score = p.final_score(8.0, 0.9, 0.0);
        assert!((score - 6.0).abs() < 1e-6);
        assert!(p.passes(score));
    }

    #[test]
    fn bonus_can_rescue_a_penalized_item() {
        let p = policy();
        // essence 7.0 minus full penalty 2.0 fails alone; myth 8.0 adds 1.2.
        let without = p.final_score(7.0, 0.9, 0.0);
        assert!(!p.passes(without));
        let with = p.final_score(7.0, 0.9, 8.0);
        assert!((with - 6.2).abs() < 1e-6);
        assert!(p.passes(with));
    }

    #[test]
    fn threshold_is_inclusive() {
        let p = policy();
        assert!(p.passes(6.0));
        assert!(!p.passes(5.999));
    }
}
