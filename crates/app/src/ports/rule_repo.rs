//! Rule repository port: persistence for condition rules.

use std::future::Future;

use wakeshift_domain::error::WakeShiftError;
use wakeshift_domain::id::RuleId;
use wakeshift_domain::rule::ConditionRule;

/// Repository for persisting and querying [`ConditionRule`]s.
///
/// Listing methods return rules in **registration order**; aggregation
/// relies on it to break priority ties.
///
/// A rule's effectiveness record is written only on `create` and through
/// [`OutcomeStore::record`](crate::ports::OutcomeStore::record).
pub trait RuleRepository {
    /// Store a new rule after every existing one.
    fn create(
        &self,
        rule: ConditionRule,
    ) -> impl Future<Output = Result<ConditionRule, WakeShiftError>> + Send;

    /// Get a rule by its identifier.
    fn get_by_id(
        &self,
        id: &RuleId,
    ) -> impl Future<Output = Result<Option<ConditionRule>, WakeShiftError>> + Send;

    /// Get all rules in registration order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ConditionRule>, WakeShiftError>> + Send;

    /// Overwrite an existing rule's configuration without changing its
    /// registration slot.
    ///
    /// The stored effectiveness record is left untouched, whatever `rule`
    /// carries; the returned rule holds the stored record.
    fn update(
        &self,
        rule: ConditionRule,
    ) -> impl Future<Output = Result<ConditionRule, WakeShiftError>> + Send;

    /// Delete a rule by its identifier.
    fn delete(&self, id: &RuleId) -> impl Future<Output = Result<(), WakeShiftError>> + Send;
}
