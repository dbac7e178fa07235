//! Shared application state for axum handlers.

use std::sync::Arc;

use wakeshift_app::adjustment_engine::AdjustmentEngine;
use wakeshift_app::effectiveness_tracker::OutcomeQueue;
use wakeshift_app::ports::{OutcomeStore, RuleRepository};
use wakeshift_app::services::rule_service::RuleService;
use wakeshift_domain::effectiveness::ReviewPolicy;

/// Application state shared across all axum handlers.
///
/// Generic over the rule repository and outcome store to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<R, O> {
    /// Rule CRUD, templates and review listing.
    pub rule_service: Arc<RuleService<R>>,
    /// Evaluates rules into wake plans.
    pub engine: Arc<AdjustmentEngine<R>>,
    /// Single writer for effectiveness updates.
    pub outcome_queue: OutcomeQueue,
    /// Read access to outcome history.
    pub outcome_store: Arc<O>,
    /// Used by the review listing.
    pub review_policy: ReviewPolicy,
}

impl<R, O> Clone for AppState<R, O> {
    fn clone(&self) -> Self {
        Self {
            rule_service: Arc::clone(&self.rule_service),
            engine: Arc::clone(&self.engine),
            outcome_queue: self.outcome_queue.clone(),
            outcome_store: Arc::clone(&self.outcome_store),
            review_policy: self.review_policy,
        }
    }
}

impl<R, O> AppState<R, O>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        rule_service: RuleService<R>,
        engine: AdjustmentEngine<R>,
        outcome_queue: OutcomeQueue,
        outcome_store: O,
        review_policy: ReviewPolicy,
    ) -> Self {
        Self {
            rule_service: Arc::new(rule_service),
            engine: Arc::new(engine),
            outcome_queue,
            outcome_store: Arc::new(outcome_store),
            review_policy,
        }
    }
}
