//! JSON REST handlers for alarm outcomes.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use wakeshift_app::ports::{OutcomeStore, RuleRepository};
use wakeshift_domain::effectiveness::EffectivenessUpdate;
use wakeshift_domain::id::RuleId;
use wakeshift_domain::outcome::{Outcome, OutcomeSignal};
use wakeshift_domain::time::{Timestamp, now};

use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

/// Request body for `POST /api/outcomes`.
#[derive(Deserialize)]
pub struct RecordRequest {
    pub fired_rule_ids: Vec<RuleId>,
    pub signal: OutcomeSignal,
    /// Defaults to the time the request is received.
    pub recorded_at: Option<Timestamp>,
}

/// Query parameters for `GET /api/outcomes`.
#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    /// Only outcomes involving this rule.
    pub rule: Option<String>,
}

/// The stored outcome and the effectiveness changes it caused.
#[derive(Serialize)]
pub struct Recorded {
    pub outcome: Outcome,
    pub updates: Vec<EffectivenessUpdate>,
}

/// Possible responses from the record endpoint.
pub enum RecordResponse {
    Created(Json<Recorded>),
}

impl IntoResponse for RecordResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Outcome>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/outcomes`: feed an alarm outcome back into rule scores.
pub async fn record<R, O>(
    State(state): State<AppState<R, O>>,
    Json(req): Json<RecordRequest>,
) -> Result<RecordResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let outcome = Outcome::new(
        req.fired_rule_ids,
        req.signal,
        req.recorded_at.unwrap_or_else(now),
    )?;
    let updates = state.outcome_queue.submit(outcome.clone()).await?;
    Ok(RecordResponse::Created(Json(Recorded { outcome, updates })))
}

/// `GET /api/outcomes?limit=N&rule=ID`: most recent outcomes first.
pub async fn list<R, O>(
    State(state): State<AppState<R, O>>,
    Query(query): Query<ListQuery>,
) -> Result<ListResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let outcomes = match query.rule {
        Some(rule) => {
            let rule_id = RuleId::new(rule)?;
            state.outcome_store.find_by_rule(&rule_id, limit).await?
        }
        None => state.outcome_store.recent(limit).await?,
    };
    Ok(ListResponse::Ok(Json(outcomes)))
}
