//! Effectiveness: how well a rule has served the user so far.
//!
//! Every alarm outcome folds one observed signal into the score of each rule
//! that fired, as an exponential moving average:
//!
//! ```text
//! score' = score * (1 - λ) + signal * λ
//! ```
//!
//! Updates never mutate in place: [`Effectiveness::observe`] returns the next
//! version of the record. A rule is *flagged for review* when it has enough
//! samples and a score below the [`ReviewPolicy`] threshold. Flagging is a
//! derived read; nothing here disables or deletes rules.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::RuleId;
use crate::time::Timestamp;

/// A score in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct EffectivenessScore(f64);

impl EffectivenessScore {
    /// Score given to rules that have never been observed.
    pub const INITIAL: Self = Self(0.75);

    /// # Errors
    ///
    /// Returns [`ValidationError::ScoreOutOfRange`] for values outside
    /// `0.0..=1.0` (including NaN).
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::ScoreOutOfRange(value))
        }
    }

    /// Clamp an arbitrary value into range; NaN maps to 0.
    #[must_use]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for EffectivenessScore {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl TryFrom<f64> for EffectivenessScore {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EffectivenessScore> for f64 {
    fn from(score: EffectivenessScore) -> Self {
        score.0
    }
}

/// Weight `λ` of the newest observation, in `(0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct LearningFactor(f64);

impl LearningFactor {
    /// # Errors
    ///
    /// Returns [`ValidationError::LearningFactorOutOfRange`] outside `(0, 1]`.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::LearningFactorOutOfRange(value))
        }
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for LearningFactor {
    fn default() -> Self {
        Self(0.3)
    }
}

impl TryFrom<f64> for LearningFactor {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LearningFactor> for f64 {
    fn from(factor: LearningFactor) -> Self {
        factor.0
    }
}

/// Versioned effectiveness record carried by every rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Effectiveness {
    pub score: EffectivenessScore,
    /// Number of outcomes folded into `score`.
    #[serde(default)]
    pub samples: u32,
    /// Incremented on every update.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

impl Effectiveness {
    /// A fresh record starting from `score`.
    #[must_use]
    pub fn starting_at(score: EffectivenessScore) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }

    /// Fold one observed signal (`0.0..=1.0`) into the record.
    #[must_use]
    pub fn observe(&self, signal: f64, factor: LearningFactor, at: Timestamp) -> Self {
        let lambda = factor.get();
        let blended = self.score.get() * (1.0 - lambda) + signal * lambda;
        Self {
            score: EffectivenessScore::saturating(blended),
            samples: self.samples.saturating_add(1),
            version: self.version + 1,
            last_updated: Some(at),
        }
    }

    /// Whether this record should be surfaced for user review.
    #[must_use]
    pub fn needs_review(&self, policy: &ReviewPolicy) -> bool {
        self.samples >= policy.min_samples && self.score < policy.threshold
    }
}

/// When a rule counts as persistently ineffective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewPolicy {
    pub threshold: EffectivenessScore,
    pub min_samples: u32,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            threshold: EffectivenessScore(0.5),
            min_samples: 5,
        }
    }
}

/// Before/after pair produced when an outcome is folded into a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessUpdate {
    pub rule_id: RuleId,
    pub previous: Effectiveness,
    pub current: Effectiveness,
    /// Whether the rule now needs review under the tracker's policy.
    pub flagged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> Timestamp {
        "2026-03-02T07:05:00Z".parse().unwrap()
    }

    #[test]
    fn should_blend_signal_with_learning_factor() {
        let record = Effectiveness::starting_at(EffectivenessScore::new(0.8).unwrap());
        let factor = LearningFactor::new(0.3).unwrap();

        let next = record.observe(0.2, factor, at());

        assert!((next.score.get() - 0.62).abs() < 1e-9);
        assert_eq!(next.samples, 1);
        assert_eq!(next.version, 1);
        assert_eq!(next.last_updated, Some(at()));
    }

    #[test]
    fn should_leave_previous_record_untouched() {
        let record = Effectiveness::default();
        let _ = record.observe(0.0, LearningFactor::default(), at());
        assert_eq!(record.samples, 0);
        assert_eq!(record.version, 0);
    }

    #[test]
    fn should_stay_within_bounds_for_extreme_signals() {
        let factor = LearningFactor::new(1.0).unwrap();
        let mut record = Effectiveness::default();
        for signal in [1.0, 0.0, 1.0, 1.0, 0.0] {
            record = record.observe(signal, factor, at());
            assert!((0.0..=1.0).contains(&record.score.get()));
        }
        assert!(record.score.get().abs() < f64::EPSILON);
    }

    #[test]
    fn should_converge_towards_repeated_signal() {
        let factor = LearningFactor::default();
        let mut record = Effectiveness::default();
        for _ in 0..30 {
            record = record.observe(0.2, factor, at());
        }
        assert!((record.score.get() - 0.2).abs() < 0.01);
    }

    #[test]
    fn should_flag_low_score_after_minimum_samples() {
        let policy = ReviewPolicy::default();
        let record = Effectiveness {
            score: EffectivenessScore::new(0.4).unwrap(),
            samples: 5,
            version: 5,
            last_updated: None,
        };
        assert!(record.needs_review(&policy));
    }

    #[test]
    fn should_not_flag_low_score_before_minimum_samples() {
        let policy = ReviewPolicy::default();
        let record = Effectiveness {
            score: EffectivenessScore::new(0.1).unwrap(),
            samples: 4,
            version: 4,
            last_updated: None,
        };
        assert!(!record.needs_review(&policy));
    }

    #[test]
    fn should_not_flag_score_at_threshold() {
        let policy = ReviewPolicy::default();
        let record = Effectiveness {
            score: EffectivenessScore::new(0.5).unwrap(),
            samples: 10,
            version: 10,
            last_updated: None,
        };
        assert!(!record.needs_review(&policy));
    }

    #[test]
    fn should_reject_out_of_range_score() {
        assert!(EffectivenessScore::new(1.2).is_err());
        assert!(EffectivenessScore::new(-0.1).is_err());
        assert!(EffectivenessScore::new(f64::NAN).is_err());
    }

    #[test]
    fn should_saturate_out_of_range_values() {
        assert!((EffectivenessScore::saturating(1.7).get() - 1.0).abs() < f64::EPSILON);
        assert!(EffectivenessScore::saturating(f64::NAN).get().abs() < f64::EPSILON);
    }

    #[test]
    fn should_reject_zero_or_excessive_learning_factor() {
        assert!(LearningFactor::new(0.0).is_err());
        assert!(LearningFactor::new(1.5).is_err());
        assert!(LearningFactor::new(0.4).is_ok());
    }

    #[test]
    fn should_reject_invalid_score_during_deserialization() {
        let json = serde_json::json!({"score": 3.0});
        let result: Result<Effectiveness, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
