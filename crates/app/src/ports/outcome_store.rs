//! Outcome store port: append-only history of alarm outcomes.

use std::future::Future;

use wakeshift_domain::effectiveness::EffectivenessUpdate;
use wakeshift_domain::error::WakeShiftError;
use wakeshift_domain::id::RuleId;
use wakeshift_domain::outcome::Outcome;

/// Append-only store for [`Outcome`]s.
pub trait OutcomeStore {
    /// Persist an outcome together with the effectiveness changes it caused.
    ///
    /// All-or-nothing: either the outcome is appended and every rule in
    /// `updates` moves from `previous` to `current`, or nothing is written.
    /// A rule whose stored version is no longer `previous.version` fails the
    /// whole call with [`WakeShiftError::Conflict`], a deleted one with
    /// [`WakeShiftError::NotFound`].
    fn record(
        &self,
        outcome: Outcome,
        updates: &[EffectivenessUpdate],
    ) -> impl Future<Output = Result<Outcome, WakeShiftError>> + Send;

    /// Most recent outcomes, newest first.
    fn recent(&self, limit: usize) -> impl Future<Output = Result<Vec<Outcome>, WakeShiftError>> + Send;

    /// Most recent outcomes involving `rule_id`, newest first.
    fn find_by_rule(
        &self,
        rule_id: &RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Outcome>, WakeShiftError>> + Send;
}
