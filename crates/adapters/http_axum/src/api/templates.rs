//! JSON REST handlers for preset rule templates.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use wakeshift_app::ports::{OutcomeStore, RuleRepository};
use wakeshift_domain::rule::ConditionRule;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ConditionRule>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the install endpoint.
pub enum InstallResponse {
    Created(Json<ConditionRule>),
}

impl IntoResponse for InstallResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/templates`: every preset, as it would be installed.
pub async fn list<R, O>(State(state): State<AppState<R, O>>) -> Result<ListResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let templates = state.rule_service.templates()?;
    Ok(ListResponse::Ok(Json(templates)))
}

/// `POST /api/templates/{name}`: register the named preset as a rule.
pub async fn install<R, O>(
    State(state): State<AppState<R, O>>,
    Path(name): Path<String>,
) -> Result<InstallResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let rule = state.rule_service.install_template(&name).await?;
    Ok(InstallResponse::Created(Json(rule)))
}
