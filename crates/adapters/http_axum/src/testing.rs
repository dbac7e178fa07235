//! In-memory ports and request helpers for handler tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use wakeshift_app::adjustment_engine::AdjustmentEngine;
use wakeshift_app::effectiveness_tracker::{EffectivenessTracker, OutcomeQueue};
use wakeshift_app::ports::{OutcomeStore, RuleRepository};
use wakeshift_app::services::rule_service::RuleService;
use wakeshift_domain::aggregation::AdjustmentCeiling;
use wakeshift_domain::effectiveness::{EffectivenessUpdate, LearningFactor, ReviewPolicy};
use wakeshift_domain::error::{ConflictError, NotFoundError, WakeShiftError};
use wakeshift_domain::id::RuleId;
use wakeshift_domain::outcome::Outcome;
use wakeshift_domain::rule::ConditionRule;

use crate::state::AppState;

#[derive(Clone, Default)]
pub struct MemoryRules(Arc<Mutex<Vec<ConditionRule>>>);

impl RuleRepository for MemoryRules {
    async fn create(&self, rule: ConditionRule) -> Result<ConditionRule, WakeShiftError> {
        self.0.lock().unwrap().push(rule.clone());
        Ok(rule)
    }

    async fn get_by_id(&self, id: &RuleId) -> Result<Option<ConditionRule>, WakeShiftError> {
        Ok(self.0.lock().unwrap().iter().find(|r| &r.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<ConditionRule>, WakeShiftError> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn update(&self, rule: ConditionRule) -> Result<ConditionRule, WakeShiftError> {
        let mut rules = self.0.lock().unwrap();
        let slot = rules
            .iter_mut()
            .find(|r| r.id == rule.id)
            .ok_or_else(|| not_found(&rule.id))?;
        let mut rule = rule;
        rule.effectiveness = slot.effectiveness.clone();
        *slot = rule.clone();
        Ok(rule)
    }

    async fn delete(&self, id: &RuleId) -> Result<(), WakeShiftError> {
        let mut rules = self.0.lock().unwrap();
        let before = rules.len();
        rules.retain(|r| &r.id != id);
        if rules.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn not_found(id: &RuleId) -> WakeShiftError {
    NotFoundError {
        entity: "ConditionRule",
        id: id.to_string(),
    }
    .into()
}

/// Outcome history writing scores into the rules of a [`MemoryRules`].
#[derive(Clone)]
pub struct MemoryOutcomes {
    rules: Arc<Mutex<Vec<ConditionRule>>>,
    outcomes: Arc<Mutex<Vec<Outcome>>>,
}

impl MemoryOutcomes {
    pub fn over(repo: &MemoryRules) -> Self {
        Self {
            rules: Arc::clone(&repo.0),
            outcomes: Arc::default(),
        }
    }
}

impl OutcomeStore for MemoryOutcomes {
    async fn record(
        &self,
        outcome: Outcome,
        updates: &[EffectivenessUpdate],
    ) -> Result<Outcome, WakeShiftError> {
        let mut rules = self.rules.lock().unwrap();
        for update in updates {
            let rule = rules
                .iter()
                .find(|r| r.id == update.rule_id)
                .ok_or_else(|| not_found(&update.rule_id))?;
            if rule.effectiveness.version != update.previous.version {
                return Err(ConflictError {
                    entity: "ConditionRule",
                    id: update.rule_id.to_string(),
                }
                .into());
            }
        }
        for update in updates {
            if let Some(rule) = rules.iter_mut().find(|r| r.id == update.rule_id) {
                rule.effectiveness = update.current.clone();
            }
        }
        self.outcomes.lock().unwrap().push(outcome.clone());
        Ok(outcome)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Outcome>, WakeShiftError> {
        Ok(self.outcomes.lock().unwrap().iter().rev().take(limit).cloned().collect())
    }

    async fn find_by_rule(&self, rule_id: &RuleId, limit: usize) -> Result<Vec<Outcome>, WakeShiftError> {
        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|o| o.fired_rule_ids.contains(rule_id))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Fully wired state over in-memory ports. Must run inside a tokio runtime.
pub fn test_state(rules: Vec<ConditionRule>) -> AppState<MemoryRules, MemoryOutcomes> {
    let repo = MemoryRules(Arc::new(Mutex::new(rules)));
    let outcomes = MemoryOutcomes::over(&repo);
    let tracker = EffectivenessTracker::new(
        repo.clone(),
        outcomes.clone(),
        LearningFactor::default(),
        ReviewPolicy::default(),
    );
    let (queue, _worker) = OutcomeQueue::spawn(tracker, 8);
    AppState::new(
        RuleService::new(repo.clone()),
        AdjustmentEngine::new(repo, AdjustmentCeiling::default()),
        queue,
        outcomes,
        ReviewPolicy::default(),
    )
}

/// Send one request and decode the JSON response body.
///
/// Empty bodies decode to `Null`, non-JSON bodies to a string.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}
