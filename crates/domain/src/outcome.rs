//! Outcome: how the user reacted to an adjusted alarm.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{OutcomeId, RuleId};
use crate::time::Timestamp;

/// Observed user response, reduced to a signal in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeSignal {
    /// Explicit satisfaction rating.
    Satisfaction { value: f64 },
    /// Alarm dismissed promptly.
    Dismissed,
    /// Alarm snoozed `count` times before dismissal.
    Snoozed { count: u32 },
    /// Alarm left ringing / never acknowledged.
    Ignored,
}

impl OutcomeSignal {
    /// Numeric signal fed to the effectiveness average.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Satisfaction { value } => value,
            Self::Dismissed => 1.0,
            Self::Snoozed { count } if count <= 1 => 0.5,
            Self::Snoozed { .. } => 0.2,
            Self::Ignored => 0.0,
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::SignalOutOfRange`] for a satisfaction value
    /// outside `0.0..=1.0`.
    pub fn validate(self) -> Result<(), ValidationError> {
        match self {
            Self::Satisfaction { value } if !(0.0..=1.0).contains(&value) => {
                Err(ValidationError::SignalOutOfRange(value))
            }
            _ => Ok(()),
        }
    }
}

/// One alarm-trigger outcome and the rules that shaped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: OutcomeId,
    pub fired_rule_ids: Vec<RuleId>,
    pub signal: OutcomeSignal,
    pub recorded_at: Timestamp,
}

impl Outcome {
    /// Create an outcome, dropping duplicate rule ids while keeping order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoFiredRules`] when `fired_rule_ids` is
    /// empty, or [`ValidationError::SignalOutOfRange`] for a bad signal.
    pub fn new(
        fired_rule_ids: Vec<RuleId>,
        signal: OutcomeSignal,
        recorded_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        signal.validate()?;
        let mut unique: Vec<RuleId> = Vec::with_capacity(fired_rule_ids.len());
        for id in fired_rule_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(ValidationError::NoFiredRules);
        }
        Ok(Self {
            id: OutcomeId::new(),
            fired_rule_ids: unique,
            signal,
            recorded_at,
        })
    }
}
