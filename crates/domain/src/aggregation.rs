//! Adjustment aggregation: combine firing rules into one bounded shift.
//!
//! Firing rules are applied in descending priority; rules of equal priority
//! keep their registration order (the sort is stable). Each rule contributes
//! its adjustment clamped to its own `max_adjustment`, then the running total
//! is clamped to `±ceiling`. What a rule *actually* moved the total by is its
//! recorded contribution, so higher-priority rules are applied in full before
//! lower-priority ones get truncated, possibly down to zero.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::evaluation::RuleEvaluation;
use crate::id::RuleId;
use crate::rule::Priority;

/// Application-wide maximum shift of a wake time, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentCeiling(u32);

impl AdjustmentCeiling {
    #[must_use]
    pub fn new(minutes: u32) -> Self {
        Self(minutes)
    }

    #[must_use]
    pub fn minutes(self) -> u32 {
        self.0
    }

    fn as_i32(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl Default for AdjustmentCeiling {
    fn default() -> Self {
        Self(120)
    }
}

/// Why the total differs from the plain sum of requested adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapReason {
    /// At least one rule asked for more than its own `max_adjustment`.
    RuleMaximum,
    /// The running total hit the application-wide ceiling.
    ApplicationCeiling,
}

impl std::fmt::Display for CapReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RuleMaximum => f.write_str("rule_maximum"),
            Self::ApplicationCeiling => f.write_str("application_ceiling"),
        }
    }
}

/// One firing rule's share of the final adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredRule {
    pub rule_id: RuleId,
    pub priority: Priority,
    /// Requested adjustment after the rule's own cap.
    pub nominal_minutes: i32,
    /// What actually entered the total.
    pub contributed_minutes: i32,
    pub reason: String,
}

/// Net wake-time shift for one evaluation cycle, with its breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    pub total_minutes: i32,
    /// In application order (priority, then registration order).
    pub fired_rules: Vec<FiredRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capped_at: Option<CapReason>,
}

impl AdjustmentResult {
    /// `true` when no rule fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fired_rules.is_empty()
    }

    /// Reasons of every fired rule, in application order.
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.fired_rules.iter().map(|fired| fired.reason.as_str())
    }

    /// One-line, user-facing explanation of the shift.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No adjustment".to_string();
        }
        let reasons = self.reasons().collect::<Vec<_>>().join("; ");
        let minutes = self.total_minutes.unsigned_abs();
        let unit = if minutes == 1 { "minute" } else { "minutes" };
        let mut summary = match self.total_minutes.signum() {
            -1 => format!("Alarm moved {minutes} {unit} earlier: {reasons}"),
            1 => format!("Alarm moved {minutes} {unit} later: {reasons}"),
            _ => format!("Alarm unchanged: {reasons}"),
        };
        if self.capped_at == Some(CapReason::ApplicationCeiling) {
            summary.push_str(" (limited by the adjustment ceiling)");
        }
        summary
    }
}

/// Combine the firing rules of `evaluations` into one bounded adjustment.
#[must_use]
pub fn aggregate(evaluations: &[RuleEvaluation<'_>], ceiling: AdjustmentCeiling) -> AdjustmentResult {
    let mut firing: Vec<&RuleEvaluation<'_>> =
        evaluations.iter().filter(|eval| eval.fires()).collect();
    firing.sort_by_key(|eval| Reverse(eval.rule.priority));

    let cap = ceiling.as_i32();
    let mut total: i32 = 0;
    let mut capped_at = None;
    let mut fired_rules = Vec::with_capacity(firing.len());

    for eval in firing {
        let adjustment = &eval.rule.adjustment;
        let nominal = adjustment.capped_minutes();
        if nominal != adjustment.time_minutes && capped_at.is_none() {
            capped_at = Some(CapReason::RuleMaximum);
        }

        let next = total.saturating_add(nominal).clamp(-cap, cap);
        let contributed = next - total;
        if contributed != nominal {
            capped_at = Some(CapReason::ApplicationCeiling);
        }
        total = next;

        fired_rules.push(FiredRule {
            rule_id: eval.rule.id.clone(),
            priority: eval.rule.priority,
            nominal_minutes: nominal,
            contributed_minutes: contributed,
            reason: adjustment.reason.clone(),
        });
    }

    AdjustmentResult {
        total_minutes: total,
        fired_rules,
        capped_at,
    }
}
