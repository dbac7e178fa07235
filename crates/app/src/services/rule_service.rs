//! Rule service: use-cases for managing condition rules.

use wakeshift_domain::effectiveness::ReviewPolicy;
use wakeshift_domain::error::{ConflictError, NotFoundError, WakeShiftError};
use wakeshift_domain::id::RuleId;
use wakeshift_domain::rule::ConditionRule;
use wakeshift_domain::template;

use crate::ports::RuleRepository;

/// Application service for condition rule CRUD operations.
pub struct RuleService<R> {
    repo: R,
}

impl<R: RuleRepository> RuleService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new rule after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] if invariants fail,
    /// [`WakeShiftError::Conflict`] if the id is taken, or a storage error
    /// propagated from the repository.
    #[tracing::instrument(skip(self, rule), fields(rule_id = %rule.id))]
    pub async fn create_rule(&self, rule: ConditionRule) -> Result<ConditionRule, WakeShiftError> {
        rule.validate()?;
        if self.repo.get_by_id(&rule.id).await?.is_some() {
            return Err(ConflictError {
                entity: "ConditionRule",
                id: rule.id.to_string(),
            }
            .into());
        }
        self.repo.create(rule).await
    }

    /// Look up a rule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::NotFound`] when no rule with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_rule(&self, id: &RuleId) -> Result<ConditionRule, WakeShiftError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "ConditionRule",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all rules in registration order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_rules(&self) -> Result<Vec<ConditionRule>, WakeShiftError> {
        self.repo.get_all().await
    }

    /// Replace a rule's configuration.
    ///
    /// The stored effectiveness record is kept: it is learned, not edited,
    /// and the repository never writes it on update.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] if invariants fail,
    /// [`WakeShiftError::NotFound`] if the rule does not exist, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, rule), fields(rule_id = %rule.id))]
    pub async fn update_rule(&self, rule: ConditionRule) -> Result<ConditionRule, WakeShiftError> {
        rule.validate()?;
        self.repo.update(rule).await
    }

    /// Enable or disable a rule without touching anything else.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::NotFound`] if the rule does not exist, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set_enabled(&self, id: &RuleId, enabled: bool) -> Result<ConditionRule, WakeShiftError> {
        let mut rule = self.get_rule(id).await?;
        if rule.enabled == enabled {
            return Ok(rule);
        }
        rule.enabled = enabled;
        self.repo.update(rule).await
    }

    /// Delete a rule by id.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::NotFound`] if the rule does not exist, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_rule(&self, id: &RuleId) -> Result<(), WakeShiftError> {
        self.repo.delete(id).await
    }

    /// Rules whose effectiveness warrants a user review under `policy`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_flagged(&self, policy: &ReviewPolicy) -> Result<Vec<ConditionRule>, WakeShiftError> {
        let rules = self.repo.get_all().await?;
        Ok(rules
            .into_iter()
            .filter(|rule| rule.effectiveness.needs_review(policy))
            .collect())
    }

    /// Every preset template, ready to be installed.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] if a template is malformed.
    pub fn templates(&self) -> Result<Vec<ConditionRule>, WakeShiftError> {
        template::all()
    }

    /// Register the preset template called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] for an unknown template,
    /// [`WakeShiftError::Conflict`] if it is already installed, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn install_template(&self, name: &str) -> Result<ConditionRule, WakeShiftError> {
        let rule = template::template(name)?;
        self.create_rule(rule).await
    }
}
