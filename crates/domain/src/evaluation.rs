//! Rule evaluation: which rules fire for a context snapshot.
//!
//! Evaluation is a pure function of its inputs. Disabled rules are skipped;
//! every enabled rule yields exactly one [`RuleEvaluation`], in the order the
//! rules were given.

use serde::{Deserialize, Serialize};

use crate::context::{ContextValue, ContextualData};
use crate::rule::{Condition, ConditionRule, Operand};

/// Result of testing one rule's condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The condition holds; the rule's adjustment applies.
    Fires,
    /// The field was present and the condition did not hold.
    Holds,
    /// The field the condition targets was not supplied. Treated as
    /// non-firing.
    MissingContext,
}

/// A rule paired with its verdict.
#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluation<'a> {
    pub rule: &'a ConditionRule,
    pub verdict: Verdict,
}

impl RuleEvaluation<'_> {
    #[must_use]
    pub fn fires(&self) -> bool {
        self.verdict == Verdict::Fires
    }

    /// The rule's adjustment clamped to its own cap, or 0 when not firing.
    #[must_use]
    pub fn nominal_minutes(&self) -> i32 {
        if self.fires() {
            self.rule.adjustment.capped_minutes()
        } else {
            0
        }
    }
}

/// Evaluate every enabled rule in `rules` against `context`.
#[must_use]
pub fn evaluate<'a>(context: &ContextualData, rules: &'a [ConditionRule]) -> Vec<RuleEvaluation<'a>> {
    rules
        .iter()
        .filter(|rule| rule.enabled)
        .map(|rule| RuleEvaluation {
            rule,
            verdict: verdict(&rule.condition, context),
        })
        .collect()
}

/// Test a single condition against the snapshot.
#[must_use]
pub fn verdict(condition: &Condition, context: &ContextualData) -> Verdict {
    match context.value(condition.field()) {
        None => Verdict::MissingContext,
        Some(value) if holds(condition, value) => Verdict::Fires,
        Some(_) => Verdict::Holds,
    }
}

#[allow(clippy::cast_precision_loss)]
fn holds(condition: &Condition, value: ContextValue<'_>) -> bool {
    match (condition, value) {
        (
            Condition::Equals {
                value: Operand::Text(expected),
                ..
            },
            ContextValue::Text(actual),
        ) => actual == expected,
        (
            Condition::Equals {
                value: Operand::Text(expected),
                ..
            },
            ContextValue::Events(events),
        ) => events.iter().any(|event| &event.title == expected),
        (
            Condition::Equals {
                value: Operand::Number(expected),
                ..
            },
            ContextValue::Number(actual),
        ) => (actual - expected).abs() <= f64::EPSILON,
        (Condition::Contains { value: needle, .. }, ContextValue::Text(actual)) => {
            contains_ignore_case(actual, needle)
        }
        (Condition::Contains { value: needle, .. }, ContextValue::Events(events)) => events
            .iter()
            .any(|event| contains_ignore_case(&event.title, needle)),
        (Condition::GreaterThan { threshold, .. }, ContextValue::Number(actual)) => {
            actual > *threshold
        }
        (Condition::GreaterThan { threshold, .. }, ContextValue::Events(events)) => {
            events.len() as f64 > *threshold
        }
        (Condition::LessThan { threshold, .. }, ContextValue::Number(actual)) => {
            actual < *threshold
        }
        (Condition::LessThan { threshold, .. }, ContextValue::Events(events)) => {
            (events.len() as f64) < *threshold
        }
        // Operator/field combinations rejected by validation never fire.
        _ => false,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
