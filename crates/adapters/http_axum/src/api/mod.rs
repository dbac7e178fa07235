//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod adjustments;
#[allow(clippy::missing_errors_doc)]
pub mod outcomes;
#[allow(clippy::missing_errors_doc)]
pub mod rules;
#[allow(clippy::missing_errors_doc)]
pub mod templates;

use axum::Router;
use axum::routing::{get, post, put};

use wakeshift_app::ports::{OutcomeStore, RuleRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, O>() -> Router<AppState<R, O>>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    Router::new()
        // Rules
        .route(
            "/rules",
            get(rules::list::<R, O>).post(rules::create::<R, O>),
        )
        .route("/rules/review", get(rules::review::<R, O>))
        .route(
            "/rules/{id}",
            get(rules::get::<R, O>)
                .put(rules::update::<R, O>)
                .delete(rules::delete::<R, O>),
        )
        .route("/rules/{id}/enabled", put(rules::set_enabled::<R, O>))
        // Templates
        .route("/templates", get(templates::list::<R, O>))
        .route("/templates/{name}", post(templates::install::<R, O>))
        // Evaluation
        .route("/adjustments", post(adjustments::plan::<R, O>))
        // Outcomes
        .route(
            "/outcomes",
            get(outcomes::list::<R, O>).post(outcomes::record::<R, O>),
        )
}
