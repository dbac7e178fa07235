//! JSON REST handler for wake-time evaluation.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use wakeshift_app::ports::{OutcomeStore, RuleRepository};
use wakeshift_domain::context::ContextualData;
use wakeshift_domain::plan::WakePlan;
use wakeshift_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/adjustments`.
#[derive(Deserialize)]
pub struct PlanRequest {
    /// Alarm time before any adjustment.
    pub base_wake_time: Timestamp,
    #[serde(default)]
    pub context: ContextualData,
}

/// Possible responses from the plan endpoint.
pub enum PlanResponse {
    Ok(Json<WakePlan>),
}

impl IntoResponse for PlanResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/adjustments`: evaluate the context for one alarm.
pub async fn plan<R, O>(
    State(state): State<AppState<R, O>>,
    Json(req): Json<PlanRequest>,
) -> Result<PlanResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let plan = state.engine.plan(req.base_wake_time, &req.context).await?;
    Ok(PlanResponse::Ok(Json(plan)))
}
