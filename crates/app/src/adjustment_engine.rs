//! Adjustment engine: turns a context snapshot into a wake plan.
//!
//! ## Cycle
//! 1. Load every rule from the repository, in registration order
//! 2. Rebuild the [`RuleRegistry`] (re-validating each rule)
//! 3. Evaluate enabled rules against the caller's [`ContextualData`]
//! 4. Aggregate firing rules under the configured [`AdjustmentCeiling`]
//! 5. Shift the base wake time by the total

use wakeshift_domain::aggregation::{AdjustmentCeiling, aggregate};
use wakeshift_domain::context::ContextualData;
use wakeshift_domain::error::WakeShiftError;
use wakeshift_domain::evaluation::evaluate;
use wakeshift_domain::plan::WakePlan;
use wakeshift_domain::registry::RuleRegistry;
use wakeshift_domain::time::Timestamp;

use crate::ports::RuleRepository;

/// Evaluates persisted rules for one alarm.
pub struct AdjustmentEngine<R> {
    repo: R,
    ceiling: AdjustmentCeiling,
}

impl<R: RuleRepository> AdjustmentEngine<R> {
    pub fn new(repo: R, ceiling: AdjustmentCeiling) -> Self {
        Self { repo, ceiling }
    }

    #[must_use]
    pub fn ceiling(&self) -> AdjustmentCeiling {
        self.ceiling
    }

    /// Compute the wake plan for an alarm due at `base_wake_time`.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the repository, or a validation error if
    /// a persisted rule no longer satisfies domain invariants or the shifted
    /// wake time is out of range.
    #[tracing::instrument(skip(self, context))]
    pub async fn plan(
        &self,
        base_wake_time: Timestamp,
        context: &ContextualData,
    ) -> Result<WakePlan, WakeShiftError> {
        let registry = RuleRegistry::from_rules(self.repo.get_all().await?)?;
        let evaluations = evaluate(context, registry.rules());
        let result = aggregate(&evaluations, self.ceiling);

        tracing::debug!(
            evaluated = evaluations.len(),
            fired = result.fired_rules.len(),
            total_minutes = result.total_minutes,
            capped_at = ?result.capped_at,
            "evaluation cycle complete"
        );
        if result.capped_at.is_some() {
            tracing::info!(
                total_minutes = result.total_minutes,
                capped_at = ?result.capped_at,
                "wake adjustment capped"
            );
        }

        Ok(WakePlan::new(base_wake_time, result, &evaluations)?)
    }
}
