//! Preset rule templates users can install with one action.

use crate::context::ContextField;
use crate::error::{ValidationError, WakeShiftError};
use crate::rule::{Condition, ConditionRule};

/// Names of every available template, in presentation order.
pub const TEMPLATE_NAMES: [&str; 8] = [
    "weather_rain",
    "weather_snow",
    "weather_cold",
    "calendar_important",
    "sleep_debt",
    "exercise_recovery",
    "stress_high",
    "screen_time_late",
];

/// Build the template called `name`.
///
/// # Errors
///
/// Returns [`ValidationError::UnknownTemplate`] for an unknown name.
pub fn template(name: &str) -> Result<ConditionRule, WakeShiftError> {
    let builder = ConditionRule::builder().id(name);
    let builder = match name {
        "weather_rain" => builder
            .name("Rainy commute")
            .priority(3)
            .condition(Condition::Contains {
                field: ContextField::WeatherCondition,
                value: "rain".to_string(),
            })
            .adjust(-10, 20, "Rain expected, allow extra commute time"),
        "weather_snow" => builder
            .name("Snowy commute")
            .priority(4)
            .condition(Condition::Contains {
                field: ContextField::WeatherCondition,
                value: "snow".to_string(),
            })
            .adjust(-20, 45, "Snow expected, roads may be slow"),
        "weather_cold" => builder
            .name("Freezing morning")
            .priority(2)
            .condition(Condition::LessThan {
                field: ContextField::Temperature,
                threshold: 0.0,
            })
            .adjust(-5, 15, "Below freezing, time to defrost the car"),
        "calendar_important" => builder
            .name("Important meeting")
            .priority(5)
            .condition(Condition::GreaterThan {
                field: ContextField::ImportantEvents,
                threshold: 0.0,
            })
            .adjust(-30, 60, "Important event on the calendar"),
        "sleep_debt" => builder
            .name("Catch up on sleep")
            .priority(3)
            .condition(Condition::GreaterThan {
                field: ContextField::SleepDebtMinutes,
                threshold: 60.0,
            })
            .adjust(15, 30, "Sleep debt above an hour"),
        "exercise_recovery" => builder
            .name("Recovery after a hard workout")
            .priority(2)
            .condition(Condition::GreaterThan {
                field: ContextField::ExerciseMinutesYesterday,
                threshold: 90.0,
            })
            .adjust(10, 20, "Long workout yesterday, extra recovery"),
        "stress_high" => builder
            .name("Calm start on stressful days")
            .priority(3)
            .condition(Condition::GreaterThan {
                field: ContextField::StressLevelPrediction,
                threshold: 7.0,
            })
            .adjust(-10, 20, "High stress predicted, start the day calmly"),
        "screen_time_late" => builder
            .name("Late screen time")
            .priority(1)
            .condition(Condition::GreaterThan {
                field: ContextField::EveningScreenTimeMinutes,
                threshold: 120.0,
            })
            .adjust(10, 15, "Long evening screen time delayed sleep"),
        _ => return Err(ValidationError::UnknownTemplate(name.to_string()).into()),
    };
    builder.build()
}

/// Every template, in presentation order.
///
/// # Errors
///
/// Never fails for the built-in set; the error type mirrors [`template`].
pub fn all() -> Result<Vec<ConditionRule>, WakeShiftError> {
    TEMPLATE_NAMES.into_iter().map(template).collect()
}
