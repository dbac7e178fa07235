//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for wake times, `last_updated`, outcome times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Shift a wake time by a signed number of minutes (negative = earlier).
///
/// # Errors
///
/// Returns [`ValidationError::WakeTimeOutOfRange`] when the result falls
/// outside the representable range.
pub fn shift_minutes(base: Timestamp, minutes: i32) -> Result<Timestamp, ValidationError> {
    base.checked_add_signed(TimeDelta::minutes(i64::from(minutes)))
        .ok_or(ValidationError::WakeTimeOutOfRange { base, minutes })
}
