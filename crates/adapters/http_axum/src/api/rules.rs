//! JSON REST handlers for condition rules.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use wakeshift_app::ports::{OutcomeStore, RuleRepository};
use wakeshift_domain::effectiveness::Effectiveness;
use wakeshift_domain::id::RuleId;
use wakeshift_domain::rule::{Adjustment, Condition, ConditionRule, ConditionRuleBuilder, RuleType};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a rule.
#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: Option<RuleType>,
    pub enabled: Option<bool>,
    pub priority: Option<u8>,
    pub condition: Condition,
    pub adjustment: Adjustment,
}

/// Request body for replacing a rule's configuration.
#[derive(Deserialize)]
pub struct UpdateRuleRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: Option<RuleType>,
    pub enabled: Option<bool>,
    pub priority: Option<u8>,
    pub condition: Condition,
    pub adjustment: Adjustment,
}

/// Request body for `PUT /api/rules/{id}/enabled`.
#[derive(Deserialize)]
pub struct EnabledRequest {
    pub enabled: bool,
}

fn configure(
    mut builder: ConditionRuleBuilder,
    name: Option<String>,
    rule_type: Option<RuleType>,
    enabled: Option<bool>,
    priority: Option<u8>,
) -> ConditionRuleBuilder {
    if let Some(name) = name {
        builder = builder.name(name);
    }
    if let Some(rule_type) = rule_type {
        builder = builder.rule_type(rule_type);
    }
    if let Some(enabled) = enabled {
        builder = builder.enabled(enabled);
    }
    if let Some(priority) = priority {
        builder = builder.priority(priority);
    }
    builder
}

/// Rule as listed for review, with the reason it was flagged.
#[derive(Serialize)]
pub struct ReviewEntry {
    pub id: RuleId,
    pub name: String,
    pub effectiveness: Effectiveness,
}

impl From<ConditionRule> for ReviewEntry {
    fn from(rule: ConditionRule) -> Self {
        Self {
            name: rule.display_name().to_string(),
            id: rule.id,
            effectiveness: rule.effectiveness,
        }
    }
}

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

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<ConditionRule>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<ConditionRule>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Possible responses from the review endpoint.
pub enum ReviewResponse {
    Ok(Json<Vec<ReviewEntry>>),
}

impl IntoResponse for ReviewResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/rules`: list rules in registration order.
pub async fn list<R, O>(State(state): State<AppState<R, O>>) -> Result<ListResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let rules = state.rule_service.list_rules().await?;
    Ok(ListResponse::Ok(Json(rules)))
}

/// `GET /api/rules/{id}`: get a rule by id.
pub async fn get<R, O>(
    State(state): State<AppState<R, O>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let rule_id = RuleId::new(id)?;
    let rule = state.rule_service.get_rule(&rule_id).await?;
    Ok(GetResponse::Ok(Json(rule)))
}

/// `POST /api/rules`: register a new rule.
pub async fn create<R, O>(
    State(state): State<AppState<R, O>>,
    Json(req): Json<CreateRuleRequest>,
) -> Result<CreateResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let builder = ConditionRule::builder()
        .id(req.id)
        .condition(req.condition)
        .adjustment(req.adjustment);
    let rule = configure(builder, req.name, req.rule_type, req.enabled, req.priority).build()?;

    let created = state.rule_service.create_rule(rule).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/rules/{id}`: replace a rule's configuration, keeping its score.
///
/// An omitted `enabled` keeps the stored flag.
pub async fn update<R, O>(
    State(state): State<AppState<R, O>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRuleRequest>,
) -> Result<GetResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let rule_id = RuleId::new(id)?;
    let enabled = match req.enabled {
        Some(enabled) => enabled,
        None => state.rule_service.get_rule(&rule_id).await?.enabled,
    };
    let builder = ConditionRule::builder()
        .id(rule_id.as_str())
        .condition(req.condition)
        .adjustment(req.adjustment);
    let rule = configure(builder, req.name, req.rule_type, Some(enabled), req.priority).build()?;

    let updated = state.rule_service.update_rule(rule).await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `PUT /api/rules/{id}/enabled`: enable or disable a rule.
pub async fn set_enabled<R, O>(
    State(state): State<AppState<R, O>>,
    Path(id): Path<String>,
    Json(req): Json<EnabledRequest>,
) -> Result<GetResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let rule_id = RuleId::new(id)?;
    let rule = state.rule_service.set_enabled(&rule_id, req.enabled).await?;
    Ok(GetResponse::Ok(Json(rule)))
}

/// `DELETE /api/rules/{id}`: delete a rule.
pub async fn delete<R, O>(
    State(state): State<AppState<R, O>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let rule_id = RuleId::new(id)?;
    state.rule_service.delete_rule(&rule_id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `GET /api/rules/review`: rules whose effectiveness stays low.
pub async fn review<R, O>(State(state): State<AppState<R, O>>) -> Result<ReviewResponse, ApiError>
where
    R: RuleRepository + Send + Sync + 'static,
    O: OutcomeStore + Send + Sync + 'static,
{
    let flagged = state.rule_service.list_flagged(&state.review_policy).await?;
    Ok(ReviewResponse::Ok(Json(
        flagged.into_iter().map(ReviewEntry::from).collect(),
    )))
}
