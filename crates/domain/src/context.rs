//! Contextual data: the signal snapshot rules are evaluated against.
//!
//! The snapshot is collected by collaborators outside this crate (weather
//! client, calendar sync, health ingester, …) and must be complete before
//! evaluation starts. Every field is optional: a missing field makes the
//! rules that target it non-firing.

use serde::{Deserialize, Serialize};

use crate::rule::RuleType;

/// A single calendar entry relevant to the wake-up day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    /// Set by calendar providers that expose a priority flag.
    #[serde(default)]
    pub important: bool,
}

impl CalendarEvent {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            important: false,
        }
    }

    #[must_use]
    pub fn important(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            important: true,
        }
    }

    /// Flagged by the provider, or titled as important.
    #[must_use]
    pub fn is_important(&self) -> bool {
        self.important || self.title.to_lowercase().contains("important")
    }
}

/// Snapshot of every external signal the engine understands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextualData {
    /// Free-form condition, e.g. `"light rain"`, `"snow"`.
    pub weather_condition: Option<String>,
    /// Probability of precipitation in `0.0..=1.0`.
    pub precipitation_chance: Option<f64>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub calendar_events: Option<Vec<CalendarEvent>>,
    pub sleep_debt_minutes: Option<i64>,
    /// `0.0..=10.0`.
    pub sleep_quality_score: Option<f64>,
    pub exercise_minutes_yesterday: Option<i64>,
    /// `0.0..=10.0`.
    pub stress_level_prediction: Option<f64>,
    pub evening_screen_time_minutes: Option<i64>,
}

/// A field of [`ContextualData`] a condition can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    WeatherCondition,
    PrecipitationChance,
    Temperature,
    CalendarEvents,
    /// Number of calendar events that are [important](CalendarEvent::is_important).
    ImportantEvents,
    SleepDebtMinutes,
    SleepQualityScore,
    ExerciseMinutesYesterday,
    StressLevelPrediction,
    EveningScreenTimeMinutes,
}

/// Shape of the value a [`ContextField`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    List,
}

impl ContextField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WeatherCondition => "weather_condition",
            Self::PrecipitationChance => "precipitation_chance",
            Self::Temperature => "temperature",
            Self::CalendarEvents => "calendar_events",
            Self::ImportantEvents => "important_events",
            Self::SleepDebtMinutes => "sleep_debt_minutes",
            Self::SleepQualityScore => "sleep_quality_score",
            Self::ExerciseMinutesYesterday => "exercise_minutes_yesterday",
            Self::StressLevelPrediction => "stress_level_prediction",
            Self::EveningScreenTimeMinutes => "evening_screen_time_minutes",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::WeatherCondition => FieldKind::Text,
            Self::CalendarEvents => FieldKind::List,
            _ => FieldKind::Number,
        }
    }

    /// The rule type whose rules may target this field.
    #[must_use]
    pub fn category(self) -> RuleType {
        match self {
            Self::WeatherCondition | Self::PrecipitationChance | Self::Temperature => {
                RuleType::Weather
            }
            Self::CalendarEvents | Self::ImportantEvents => RuleType::Calendar,
            Self::SleepDebtMinutes | Self::SleepQualityScore => RuleType::SleepDebt,
            Self::ExerciseMinutesYesterday => RuleType::Exercise,
            Self::StressLevelPrediction => RuleType::StressLevel,
            Self::EveningScreenTimeMinutes => RuleType::ScreenTime,
        }
    }
}

impl std::fmt::Display for ContextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, borrowed field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContextValue<'a> {
    Text(&'a str),
    Number(f64),
    Events(&'a [CalendarEvent]),
}

impl ContextualData {
    /// Resolve a field, or `None` when the provider did not supply it.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, field: ContextField) -> Option<ContextValue<'_>> {
        match field {
            ContextField::WeatherCondition => {
                self.weather_condition.as_deref().map(ContextValue::Text)
            }
            ContextField::PrecipitationChance => self.precipitation_chance.map(ContextValue::Number),
            ContextField::Temperature => self.temperature.map(ContextValue::Number),
            ContextField::CalendarEvents => {
                self.calendar_events.as_deref().map(ContextValue::Events)
            }
            ContextField::ImportantEvents => self.calendar_events.as_deref().map(|events| {
                ContextValue::Number(events.iter().filter(|e| e.is_important()).count() as f64)
            }),
            ContextField::SleepDebtMinutes => self
                .sleep_debt_minutes
                .map(|v| ContextValue::Number(v as f64)),
            ContextField::SleepQualityScore => self.sleep_quality_score.map(ContextValue::Number),
            ContextField::ExerciseMinutesYesterday => self
                .exercise_minutes_yesterday
                .map(|v| ContextValue::Number(v as f64)),
            ContextField::StressLevelPrediction => {
                self.stress_level_prediction.map(ContextValue::Number)
            }
            ContextField::EveningScreenTimeMinutes => self
                .evening_screen_time_minutes
                .map(|v| ContextValue::Number(v as f64)),
        }
    }
}
