//! Condition: the predicate deciding whether a rule fires.

use serde::{Deserialize, Serialize};

use crate::context::{ContextField, FieldKind};
use crate::error::ValidationError;
use crate::rule::RuleType;

/// Comparison operand for [`Condition::Equals`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// A predicate over one [`ContextField`].
///
/// The operator set is closed; each variant carries the operand type it
/// needs, so a numeric comparison can never be configured with a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "snake_case")]
pub enum Condition {
    /// Exact match against a string or number.
    Equals { field: ContextField, value: Operand },
    /// Case-insensitive substring / keyword match.
    Contains { field: ContextField, value: String },
    /// Strictly greater than `threshold`.
    GreaterThan { field: ContextField, threshold: f64 },
    /// Strictly less than `threshold`.
    LessThan { field: ContextField, threshold: f64 },
}

impl Condition {
    #[must_use]
    pub fn field(&self) -> ContextField {
        match self {
            Self::Equals { field, .. }
            | Self::Contains { field, .. }
            | Self::GreaterThan { field, .. }
            | Self::LessThan { field, .. } => *field,
        }
    }

    #[must_use]
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Equals { .. } => "equals",
            Self::Contains { .. } => "contains",
            Self::GreaterThan { .. } => "greater_than",
            Self::LessThan { .. } => "less_than",
        }
    }

    /// Check that the operand is well formed, that the operator applies to
    /// the field's kind and that the field belongs to `rule_type`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self, rule_type: RuleType) -> Result<(), ValidationError> {
        let field = self.field();
        let mismatch = || ValidationError::OperatorFieldMismatch {
            operator: self.operator(),
            field: field.as_str(),
        };

        match self {
            Self::Equals {
                value: Operand::Text(text),
                ..
            } => {
                if text.trim().is_empty() {
                    return Err(ValidationError::EmptyOperand {
                        field: field.as_str(),
                    });
                }
                if field.kind() == FieldKind::Number {
                    return Err(mismatch());
                }
            }
            Self::Equals {
                value: Operand::Number(number),
                ..
            } => {
                if !number.is_finite() {
                    return Err(ValidationError::NonFiniteThreshold {
                        field: field.as_str(),
                    });
                }
                if field.kind() != FieldKind::Number {
                    return Err(mismatch());
                }
            }
            Self::Contains { value, .. } => {
                if value.trim().is_empty() {
                    return Err(ValidationError::EmptyOperand {
                        field: field.as_str(),
                    });
                }
                if field.kind() == FieldKind::Number {
                    return Err(mismatch());
                }
            }
            Self::GreaterThan { threshold, .. } | Self::LessThan { threshold, .. } => {
                if !threshold.is_finite() {
                    return Err(ValidationError::NonFiniteThreshold {
                        field: field.as_str(),
                    });
                }
                if field.kind() == FieldKind::Text {
                    return Err(mismatch());
                }
            }
        }

        if field.category() != rule_type {
            return Err(ValidationError::FieldCategoryMismatch {
                field: field.as_str(),
                rule_type: rule_type.as_str(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equals { field, value } => write!(f, "{field} == {value}"),
            Self::Contains { field, value } => write!(f, "{field} contains {value:?}"),
            Self::GreaterThan { field, threshold } => write!(f, "{field} > {threshold}"),
            Self::LessThan { field, threshold } => write!(f, "{field} < {threshold}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_contains_condition() {
        let c = Condition::Contains {
            field: ContextField::WeatherCondition,
            value: "rain".to_string(),
        };
        assert_eq!(c.to_string(), "weather_condition contains \"rain\"");
    }

    #[test]
    fn should_display_threshold_condition() {
        let c = Condition::GreaterThan {
            field: ContextField::SleepDebtMinutes,
            threshold: 60.0,
        };
        assert_eq!(c.to_string(), "sleep_debt_minutes > 60");
    }

    #[test]
    fn should_accept_keyword_match_on_calendar() {
        let c = Condition::Contains {
            field: ContextField::CalendarEvents,
            value: "meeting".to_string(),
        };
        assert!(c.validate(RuleType::Calendar).is_ok());
    }

    #[test]
    fn should_reject_numeric_comparison_on_text_field() {
        let c = Condition::GreaterThan {
            field: ContextField::WeatherCondition,
            threshold: 1.0,
        };
        assert!(matches!(
            c.validate(RuleType::Weather),
            Err(ValidationError::OperatorFieldMismatch {
                operator: "greater_than",
                ..
            })
        ));
    }

    #[test]
    fn should_reject_text_equality_on_numeric_field() {
        let c = Condition::Equals {
            field: ContextField::Temperature,
            value: Operand::Text("cold".to_string()),
        };
        assert!(matches!(
            c.validate(RuleType::Weather),
            Err(ValidationError::OperatorFieldMismatch { .. })
        ));
    }

    #[test]
    fn should_reject_blank_operand() {
        let c = Condition::Contains {
            field: ContextField::WeatherCondition,
            value: "  ".to_string(),
        };
        assert!(matches!(
            c.validate(RuleType::Weather),
            Err(ValidationError::EmptyOperand { .. })
        ));
    }

    #[test]
    fn should_reject_non_finite_threshold() {
        let c = Condition::LessThan {
            field: ContextField::Temperature,
            threshold: f64::NAN,
        };
        assert!(matches!(
            c.validate(RuleType::Weather),
            Err(ValidationError::NonFiniteThreshold { .. })
        ));
    }

    #[test]
    fn should_reject_field_from_another_category() {
        let c = Condition::GreaterThan {
            field: ContextField::StressLevelPrediction,
            threshold: 7.0,
        };
        assert!(matches!(
            c.validate(RuleType::Weather),
            Err(ValidationError::FieldCategoryMismatch {
                field: "stress_level_prediction",
                rule_type: "weather",
            })
        ));
    }

    #[test]
    fn should_deserialize_equals_with_numeric_operand() {
        let json = serde_json::json!({
            "operator": "equals",
            "field": "exercise_minutes_yesterday",
            "value": 0
        });
        let c: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(
            c,
            Condition::Equals {
                field: ContextField::ExerciseMinutesYesterday,
                value: Operand::Number(0.0),
            }
        );
    }

    #[test]
    fn should_deserialize_threshold_condition_from_tagged_json() {
        let json = serde_json::json!({
            "operator": "less_than",
            "field": "temperature",
            "threshold": -5
        });
        let c: Condition = serde_json::from_value(json).unwrap();
        assert!(
            matches!(c, Condition::LessThan { field: ContextField::Temperature, threshold } if threshold < -4.9)
        );
    }
}
