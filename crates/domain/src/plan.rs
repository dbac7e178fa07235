//! Wake plan: what the alarm subsystem receives after an evaluation cycle.

use serde::{Deserialize, Serialize};

use crate::aggregation::AdjustmentResult;
use crate::error::ValidationError;
use crate::evaluation::{RuleEvaluation, Verdict};
use crate::id::RuleId;
use crate::time::{Timestamp, shift_minutes};

/// Verdict of one enabled rule, kept for "why did my alarm move?" views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedRule {
    pub rule_id: RuleId,
    pub verdict: Verdict,
}

impl From<&RuleEvaluation<'_>> for EvaluatedRule {
    fn from(eval: &RuleEvaluation<'_>) -> Self {
        Self {
            rule_id: eval.rule.id.clone(),
            verdict: eval.verdict,
        }
    }
}

/// Base and adjusted wake time with the explanation of the shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakePlan {
    pub base_wake_time: Timestamp,
    pub adjusted_wake_time: Timestamp,
    pub summary: String,
    pub result: AdjustmentResult,
    pub evaluations: Vec<EvaluatedRule>,
}

impl WakePlan {
    /// # Errors
    ///
    /// Returns [`ValidationError::WakeTimeOutOfRange`] when the shifted wake
    /// time cannot be represented.
    pub fn new(
        base_wake_time: Timestamp,
        result: AdjustmentResult,
        evaluations: &[RuleEvaluation<'_>],
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            base_wake_time,
            adjusted_wake_time: shift_minutes(base_wake_time, result.total_minutes)?,
            summary: result.summary(),
            result,
            evaluations: evaluations.iter().map(EvaluatedRule::from).collect(),
        })
    }

    /// `true` when the alarm keeps its base time.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.adjusted_wake_time == self.base_wake_time
    }
}
