//! Adjustment and priority: what a firing rule does to the wake time.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Signed wake-time shift requested by a rule, with its own cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Negative moves the alarm earlier, positive later.
    pub time_minutes: i32,
    /// Largest magnitude this rule may ever contribute.
    pub max_adjustment: u32,
    /// Explanation surfaced to the user when the rule fires.
    pub reason: String,
}

impl Adjustment {
    #[must_use]
    pub fn new(time_minutes: i32, max_adjustment: u32, reason: impl Into<String>) -> Self {
        Self {
            time_minutes,
            max_adjustment,
            reason: reason.into(),
        }
    }

    /// `time_minutes` clamped to `±max_adjustment`.
    #[must_use]
    pub fn capped_minutes(&self) -> i32 {
        let cap = i32::try_from(self.max_adjustment).unwrap_or(i32::MAX);
        self.time_minutes.clamp(-cap, cap)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyReason`] when the reason is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reason.trim().is_empty() {
            return Err(ValidationError::EmptyReason);
        }
        Ok(())
    }
}

/// Rule priority in `1..=5`; 5 is the highest (safety critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const LOWEST: Self = Self(1);
    pub const NORMAL: Self = Self(3);
    pub const HIGHEST: Self = Self(5);

    /// # Errors
    ///
    /// Returns [`ValidationError::PriorityOutOfRange`] outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::PriorityOutOfRange(value))
        }
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<u8> for Priority {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}
