//! Rule registry: the explicit, ordered set of rules evaluation runs over.
//!
//! Registration order is significant: it breaks ties between rules of equal
//! priority during aggregation. [`RuleRegistry::replace`] keeps a rule in its
//! original slot so edits never reorder it.

use crate::error::{ConflictError, NotFoundError, WakeShiftError};
use crate::id::RuleId;
use crate::rule::ConditionRule;

/// Ordered collection of validated rules with unique ids.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<ConditionRule>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from rules listed in registration order.
    ///
    /// # Errors
    ///
    /// Returns the first validation or duplicate-id error.
    pub fn from_rules(rules: impl IntoIterator<Item = ConditionRule>) -> Result<Self, WakeShiftError> {
        let mut registry = Self::new();
        for rule in rules {
            registry.insert(rule)?;
        }
        Ok(registry)
    }

    /// Append a rule.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] for an invalid rule and
    /// [`WakeShiftError::Conflict`] when the id is already registered.
    pub fn insert(&mut self, rule: ConditionRule) -> Result<(), WakeShiftError> {
        rule.validate()?;
        if self.contains(&rule.id) {
            return Err(ConflictError {
                entity: "ConditionRule",
                id: rule.id.to_string(),
            }
            .into());
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Replace the rule with the same id, keeping its registration slot.
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] for an invalid rule and
    /// [`WakeShiftError::NotFound`] when no rule has that id.
    pub fn replace(&mut self, rule: ConditionRule) -> Result<ConditionRule, WakeShiftError> {
        rule.validate()?;
        let slot = self
            .rules
            .iter_mut()
            .find(|existing| existing.id == rule.id)
            .ok_or_else(|| not_found(&rule.id))?;
        Ok(std::mem::replace(slot, rule))
    }

    /// # Errors
    ///
    /// Returns [`WakeShiftError::NotFound`] when no rule has that id.
    pub fn remove(&mut self, id: &RuleId) -> Result<ConditionRule, WakeShiftError> {
        let index = self
            .rules
            .iter()
            .position(|rule| &rule.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(self.rules.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &RuleId) -> Option<&ConditionRule> {
        self.rules.iter().find(|rule| &rule.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &RuleId) -> bool {
        self.get(id).is_some()
    }

    /// All rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[ConditionRule] {
        &self.rules
    }

    /// Enabled rules in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &ConditionRule> {
        self.rules.iter().filter(|rule| rule.enabled)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn not_found(id: &RuleId) -> WakeShiftError {
    NotFoundError {
        entity: "ConditionRule",
        id: id.to_string(),
    }
    .into()
}
