//! Condition rules: condition to adjustment pairs.
//!
//! A [`ConditionRule`] watches one field of the
//! [`ContextualData`](crate::context::ContextualData) snapshot. When its
//! [`Condition`] holds, the rule asks for its [`Adjustment`] to be applied
//! to the wake time. Rules carry a [`Priority`] used when several rules
//! compete for the adjustment ceiling, and an
//! [`Effectiveness`](crate::effectiveness::Effectiveness) record fed by
//! alarm outcomes.

mod adjustment;
mod condition;

pub use adjustment::{Adjustment, Priority};
pub use condition::{Condition, Operand};

use serde::{Deserialize, Serialize};

use crate::effectiveness::Effectiveness;
use crate::error::{ValidationError, WakeShiftError};
use crate::id::RuleId;

/// Signal family a rule reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Weather,
    Calendar,
    SleepDebt,
    Exercise,
    StressLevel,
    ScreenTime,
}

impl RuleType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Calendar => "calendar",
            Self::SleepDebt => "sleep_debt",
            Self::Exercise => "exercise",
            Self::StressLevel => "stress_level",
            Self::ScreenTime => "screen_time",
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured trigger + adjustment pair affecting wake time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub id: RuleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub enabled: bool,
    pub priority: Priority,
    pub condition: Condition,
    pub adjustment: Adjustment,
    #[serde(default)]
    pub effectiveness: Effectiveness,
}

impl ConditionRule {
    /// Create a builder for constructing a [`ConditionRule`].
    #[must_use]
    pub fn builder() -> ConditionRuleBuilder {
        ConditionRuleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// `id`, `priority` and the effectiveness score are range-checked by
    /// their own types; this covers what only the whole rule can know.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyReason`] for a blank reason, or the
    /// condition's error when its operand, operator or field is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.adjustment.validate()?;
        self.condition.validate(self.rule_type)
    }

    /// Human label, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Step-by-step builder for [`ConditionRule`].
#[derive(Debug, Default)]
pub struct ConditionRuleBuilder {
    id: Option<String>,
    name: Option<String>,
    rule_type: Option<RuleType>,
    enabled: Option<bool>,
    priority: Option<u8>,
    condition: Option<Condition>,
    adjustment: Option<Adjustment>,
    effectiveness: Option<Effectiveness>,
}

impl ConditionRuleBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Defaults to the category of the condition's field.
    #[must_use]
    pub fn rule_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn adjustment(mut self, adjustment: Adjustment) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    /// Shorthand for [`Self::adjustment`].
    #[must_use]
    pub fn adjust(self, time_minutes: i32, max_adjustment: u32, reason: impl Into<String>) -> Self {
        self.adjustment(Adjustment::new(time_minutes, max_adjustment, reason))
    }

    #[must_use]
    pub fn effectiveness(mut self, effectiveness: Effectiveness) -> Self {
        self.effectiveness = Some(effectiveness);
        self
    }

    /// Consume the builder, validate, and return a [`ConditionRule`].
    ///
    /// # Errors
    ///
    /// Returns [`WakeShiftError::Validation`] if required fields are missing
    /// or any invariant fails.
    pub fn build(self) -> Result<ConditionRule, WakeShiftError> {
        let id = RuleId::new(self.id.unwrap_or_default())?;
        let condition = self.condition.ok_or(ValidationError::MissingCondition)?;
        let priority = match self.priority {
            Some(value) => Priority::new(value)?,
            None => Priority::default(),
        };
        let rule = ConditionRule {
            id,
            name: self.name,
            rule_type: self
                .rule_type
                .unwrap_or_else(|| condition.field().category()),
            enabled: self.enabled.unwrap_or(true),
            priority,
            condition,
            adjustment: self
                .adjustment
                .unwrap_or_else(|| Adjustment::new(0, 0, String::new())),
            effectiveness: self.effectiveness.unwrap_or_default(),
        };
        rule.validate()?;
        Ok(rule)
    }
}
