//! Effectiveness tracker: folds alarm outcomes into rule scores.
//!
//! [`EffectivenessTracker`] applies one outcome to every rule that shaped the
//! alarm. [`OutcomeQueue`] puts a single worker task in front of it so that
//! two outcomes never read-modify-write the same rule concurrently: callers
//! submit through a bounded `mpsc` channel and await the worker's reply on a
//! `oneshot`.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use wakeshift_domain::effectiveness::{EffectivenessUpdate, LearningFactor, ReviewPolicy};
use wakeshift_domain::error::{ValidationError, WakeShiftError};
use wakeshift_domain::id::RuleId;
use wakeshift_domain::outcome::Outcome;

use crate::ports::{OutcomeStore, RuleRepository};

/// Applies outcomes to the effectiveness records of the rules involved.
pub struct EffectivenessTracker<R, O> {
    rules: R,
    outcomes: O,
    factor: LearningFactor,
    policy: ReviewPolicy,
}

impl<R, O> EffectivenessTracker<R, O>
where
    R: RuleRepository,
    O: OutcomeStore,
{
    pub fn new(rules: R, outcomes: O, factor: LearningFactor, policy: ReviewPolicy) -> Self {
        Self {
            rules,
            outcomes,
            factor,
            policy,
        }
    }

    /// Fold `outcome` into each fired rule and add it to the history.
    ///
    /// Rules deleted since the alarm fired are skipped. The new scores and
    /// the outcome are committed together through [`OutcomeStore::record`],
    /// so a failed call leaves every rule as it was and can be retried.
    /// Nothing here ever disables or removes a rule; low scores only raise
    /// the `flagged` bit.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] for an outcome without rules or
    /// with an out-of-range signal, or an error from either port.
    #[tracing::instrument(skip(self, outcome), fields(outcome_id = %outcome.id))]
    pub async fn record_outcome(
        &self,
        outcome: Outcome,
    ) -> Result<Vec<EffectivenessUpdate>, WakeShiftError> {
        outcome.signal.validate()?;
        let mut rule_ids: Vec<&RuleId> = Vec::with_capacity(outcome.fired_rule_ids.len());
        for id in &outcome.fired_rule_ids {
            if !rule_ids.contains(&id) {
                rule_ids.push(id);
            }
        }
        if rule_ids.is_empty() {
            return Err(ValidationError::NoFiredRules.into());
        }

        let signal = outcome.signal.value();
        let mut updates = Vec::with_capacity(rule_ids.len());
        for id in rule_ids {
            let Some(rule) = self.rules.get_by_id(id).await? else {
                tracing::warn!(rule_id = %id, "outcome references unknown rule, skipping");
                continue;
            };
            let current = rule
                .effectiveness
                .observe(signal, self.factor, outcome.recorded_at);
            updates.push(EffectivenessUpdate {
                flagged: current.needs_review(&self.policy),
                rule_id: rule.id,
                previous: rule.effectiveness,
                current,
            });
        }

        self.outcomes.record(outcome, &updates).await?;

        for update in updates.iter().filter(|u| u.flagged) {
            tracing::info!(
                rule_id = %update.rule_id,
                score = update.current.score.get(),
                samples = update.current.samples,
                "rule flagged for review"
            );
        }
        tracing::debug!(updated = updates.len(), "outcome recorded");
        Ok(updates)
    }
}

type Reply = oneshot::Sender<Result<Vec<EffectivenessUpdate>, WakeShiftError>>;

struct Submission {
    outcome: Outcome,
    reply: Reply,
}

/// Handle to the single worker that owns all effectiveness writes.
#[derive(Clone)]
pub struct OutcomeQueue {
    sender: mpsc::Sender<Submission>,
}

impl OutcomeQueue {
    /// Start the worker on the current tokio runtime.
    ///
    /// The worker stops once every [`OutcomeQueue`] handle is dropped.
    pub fn spawn<R, O>(tracker: EffectivenessTracker<R, O>, capacity: usize) -> (Self, JoinHandle<()>)
    where
        R: RuleRepository + Send + Sync + 'static,
        O: OutcomeStore + Send + Sync + 'static,
    {
        let (sender, mut receiver) = mpsc::channel::<Submission>(capacity.max(1));
        let handle = tokio::spawn(async move {
            while let Some(Submission { outcome, reply }) = receiver.recv().await {
                let result = tracker.record_outcome(outcome).await;
                if reply.send(result).is_err() {
                    tracing::debug!("outcome submitter went away before the reply");
                }
            }
            tracing::debug!("outcome queue closed");
        });
        (Self { sender }, handle)
    }

    /// Queue `outcome` and wait until the worker has applied it.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Unavailable`] when the worker has stopped,
    /// otherwise whatever [`EffectivenessTracker::record_outcome`] returned.
    pub async fn submit(&self, outcome: Outcome) -> Result<Vec<EffectivenessUpdate>, WakeShiftError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Submission { outcome, reply })
            .await
            .map_err(|_| WakeShiftError::Unavailable("outcome queue"))?;
        response
            .await
            .map_err(|_| WakeShiftError::Unavailable("outcome queue"))?
    }
}
