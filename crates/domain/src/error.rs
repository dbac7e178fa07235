//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`WakeShiftError`] via `#[from]` (no `String` variants).
//!
//! Computational edge cases are deliberately absent here: a rule whose
//! contextual field is missing simply does not fire, and an adjustment
//! exceeding the ceiling is clamped and reported through
//! [`AdjustmentResult::capped_at`](crate::aggregation::AdjustmentResult).

/// Workspace-wide error.
#[derive(Debug, thiserror::Error)]
pub enum WakeShiftError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// A background worker required for the operation is gone.
    #[error("{0} is unavailable")]
    Unavailable(&'static str),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Rejected rule configuration or malformed input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("rule id must not be empty")]
    EmptyRuleId,

    #[error("rule id {0:?} may only contain lowercase letters, digits, '_', '-' or '.' (max 64)")]
    InvalidRuleId(String),

    #[error("priority {0} is outside 1..=5")]
    PriorityOutOfRange(u8),

    #[error("effectiveness score {0} is outside 0..=1")]
    ScoreOutOfRange(f64),

    #[error("learning factor {0} is outside (0, 1]")]
    LearningFactorOutOfRange(f64),

    #[error("satisfaction signal {0} is outside 0..=1")]
    SignalOutOfRange(f64),

    #[error("adjustment reason must not be empty")]
    EmptyReason,

    #[error("rule must have a condition")]
    MissingCondition,

    #[error("condition operand for {field} must not be empty")]
    EmptyOperand { field: &'static str },

    #[error("condition threshold for {field} must be a finite number")]
    NonFiniteThreshold { field: &'static str },

    #[error("operator {operator} cannot be applied to {field}")]
    OperatorFieldMismatch {
        operator: &'static str,
        field: &'static str,
    },

    #[error("field {field} does not belong to {rule_type} rules")]
    FieldCategoryMismatch {
        field: &'static str,
        rule_type: &'static str,
    },

    #[error("an outcome must reference at least one rule")]
    NoFiredRules,

    #[error("unknown rule template {0:?}")]
    UnknownTemplate(String),

    #[error("wake time {base} shifted by {minutes} minutes is out of range")]
    WakeTimeOutOfRange {
        base: crate::time::Timestamp,
        minutes: i32,
    },
}

/// Lookup of a missing record.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Insert of a record whose identity is already taken.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} already exists")]
pub struct ConflictError {
    pub entity: &'static str,
    pub id: String,
}
