//! In-memory port implementations shared by the service tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use wakeshift_domain::effectiveness::EffectivenessUpdate;
use wakeshift_domain::error::{ConflictError, NotFoundError, WakeShiftError};
use wakeshift_domain::id::RuleId;
use wakeshift_domain::outcome::Outcome;
use wakeshift_domain::rule::ConditionRule;

use crate::ports::{OutcomeStore, RuleRepository};

#[derive(Clone, Default)]
pub struct InMemoryRuleRepo {
    rules: Arc<Mutex<Vec<ConditionRule>>>,
}

impl InMemoryRuleRepo {
    pub fn with(rules: impl IntoIterator<Item = ConditionRule>) -> Self {
        Self {
            rules: Arc::new(Mutex::new(rules.into_iter().collect())),
        }
    }

    pub fn snapshot(&self) -> Vec<ConditionRule> {
        self.rules.lock().unwrap().clone()
    }
}

impl RuleRepository for InMemoryRuleRepo {
    fn create(
        &self,
        rule: ConditionRule,
    ) -> impl Future<Output = Result<ConditionRule, WakeShiftError>> + Send {
        let mut rules = self.rules.lock().unwrap();
        let result = if rules.iter().any(|r| r.id == rule.id) {
            Err(ConflictError {
                entity: "ConditionRule",
                id: rule.id.to_string(),
            }
            .into())
        } else {
            rules.push(rule.clone());
            Ok(rule)
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: &RuleId,
    ) -> impl Future<Output = Result<Option<ConditionRule>, WakeShiftError>> + Send {
        let rules = self.rules.lock().unwrap();
        let result = rules.iter().find(|r| &r.id == id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConditionRule>, WakeShiftError>> + Send {
        let result = self.rules.lock().unwrap().clone();
        async { Ok(result) }
    }

    fn update(
        &self,
        mut rule: ConditionRule,
    ) -> impl Future<Output = Result<ConditionRule, WakeShiftError>> + Send {
        let mut rules = self.rules.lock().unwrap();
        let result = match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(slot) => {
                rule.effectiveness = slot.effectiveness.clone();
                *slot = rule.clone();
                Ok(rule)
            }
            None => Err(NotFoundError {
                entity: "ConditionRule",
                id: rule.id.to_string(),
            }
            .into()),
        };
        async { result }
    }

    fn delete(&self, id: &RuleId) -> impl Future<Output = Result<(), WakeShiftError>> + Send {
        let mut rules = self.rules.lock().unwrap();
        let before = rules.len();
        rules.retain(|r| &r.id != id);
        let result = if rules.len() == before {
            Err(NotFoundError {
                entity: "ConditionRule",
                id: id.to_string(),
            }
            .into())
        } else {
            Ok(())
        };
        async { result }
    }
}

/// Outcome history sharing its rules with an [`InMemoryRuleRepo`].
#[derive(Clone, Default)]
pub struct InMemoryOutcomeStore {
    rules: Arc<Mutex<Vec<ConditionRule>>>,
    outcomes: Arc<Mutex<Vec<Outcome>>>,
    broken: bool,
}

impl InMemoryOutcomeStore {
    pub fn over(repo: &InMemoryRuleRepo) -> Self {
        Self {
            rules: Arc::clone(&repo.rules),
            ..Self::default()
        }
    }

    /// A store whose every `record` fails with a storage error.
    pub fn broken(repo: &InMemoryRuleRepo) -> Self {
        Self {
            broken: true,
            ..Self::over(repo)
        }
    }

    pub fn snapshot(&self) -> Vec<Outcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

fn apply(rules: &mut [ConditionRule], updates: &[EffectivenessUpdate]) -> Result<(), WakeShiftError> {
    for update in updates {
        let rule = rules
            .iter()
            .find(|r| r.id == update.rule_id)
            .ok_or_else(|| NotFoundError {
                entity: "ConditionRule",
                id: update.rule_id.to_string(),
            })?;
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
    Ok(())
}

impl OutcomeStore for InMemoryOutcomeStore {
    fn record(
        &self,
        outcome: Outcome,
        updates: &[EffectivenessUpdate],
    ) -> impl Future<Output = Result<Outcome, WakeShiftError>> + Send {
        let result = if self.broken {
            Err(WakeShiftError::Storage("disk full".into()))
        } else {
            apply(&mut self.rules.lock().unwrap(), updates).map(|()| {
                self.outcomes.lock().unwrap().push(outcome.clone());
                outcome
            })
        };
        async { result }
    }

    fn recent(&self, limit: usize) -> impl Future<Output = Result<Vec<Outcome>, WakeShiftError>> + Send {
        let outcomes = self.outcomes.lock().unwrap();
        let result: Vec<Outcome> = outcomes.iter().rev().take(limit).cloned().collect();
        async { Ok(result) }
    }

    fn find_by_rule(
        &self,
        rule_id: &RuleId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Outcome>, WakeShiftError>> + Send {
        let outcomes = self.outcomes.lock().unwrap();
        let result: Vec<Outcome> = outcomes
            .iter()
            .rev()
            .filter(|o| o.fired_rule_ids.contains(rule_id))
            .take(limit)
            .cloned()
            .collect();
        async { Ok(result) }
    }
}
