//! `SQLite` implementation of [`RuleRepository`].
//!
//! The condition and adjustment are stored as JSON; the effectiveness record
//! is spread over plain columns so it can be inspected with SQL. The `seq`
//! autoincrement column keeps registration order across restarts.
//!
//! `update` writes configuration columns only. The effectiveness columns are
//! owned by [`SqliteOutcomeStore::record`](crate::SqliteOutcomeStore).

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use wakeshift_app::ports::RuleRepository;
use wakeshift_domain::effectiveness::{Effectiveness, EffectivenessScore};
use wakeshift_domain::error::{ConflictError, NotFoundError, WakeShiftError};
use wakeshift_domain::id::RuleId;
use wakeshift_domain::rule::{ConditionRule, Priority};

use crate::error::{StorageError, decode};

struct Wrapper(ConditionRule);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<ConditionRule> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: Option<String> = row.try_get("name")?;
        let rule_type: String = row.try_get("rule_type")?;
        let enabled: bool = row.try_get("enabled")?;
        let priority: i64 = row.try_get("priority")?;
        let condition_json: String = row.try_get("condition")?;
        let adjustment_json: String = row.try_get("adjustment")?;
        let score: f64 = row.try_get("score")?;
        let samples: i64 = row.try_get("samples")?;
        let version: i64 = row.try_get("version")?;
        let last_updated_str: Option<String> = row.try_get("last_updated")?;

        let priority = u8::try_from(priority).map_err(decode)?;
        let last_updated = last_updated_str
            .map(|s| {
                chrono::DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.to_utc())
                    .map_err(decode)
            })
            .transpose()?;

        Ok(Self(ConditionRule {
            id: RuleId::new(id).map_err(decode)?,
            name,
            rule_type: serde_json::from_value(serde_json::Value::String(rule_type))
                .map_err(decode)?,
            enabled,
            priority: Priority::new(priority).map_err(decode)?,
            condition: serde_json::from_str(&condition_json).map_err(decode)?,
            adjustment: serde_json::from_str(&adjustment_json).map_err(decode)?,
            effectiveness: Effectiveness {
                score: EffectivenessScore::new(score).map_err(decode)?,
                samples: u32::try_from(samples).map_err(decode)?,
                version: u64::try_from(version).map_err(decode)?,
                last_updated,
            },
        }))
    }
}

/// Column values of one rule, ready to bind.
struct Columns {
    condition: String,
    adjustment: String,
    priority: i64,
    effectiveness: EffectivenessColumns,
}

impl Columns {
    fn of(rule: &ConditionRule) -> Result<Self, StorageError> {
        Ok(Self {
            condition: serde_json::to_string(&rule.condition)?,
            adjustment: serde_json::to_string(&rule.adjustment)?,
            priority: i64::from(rule.priority.get()),
            effectiveness: EffectivenessColumns::of(&rule.effectiveness),
        })
    }
}

/// The `score`, `samples`, `version` and `last_updated` columns.
pub(crate) struct EffectivenessColumns {
    pub(crate) score: f64,
    pub(crate) samples: i64,
    pub(crate) version: i64,
    pub(crate) last_updated: Option<String>,
}

impl EffectivenessColumns {
    pub(crate) fn of(record: &Effectiveness) -> Self {
        Self {
            score: record.score.get(),
            samples: i64::from(record.samples),
            version: version_column(record.version),
            last_updated: record.last_updated.map(|ts| ts.to_rfc3339()),
        }
    }
}

pub(crate) fn version_column(version: u64) -> i64 {
    i64::try_from(version).unwrap_or(i64::MAX)
}

pub(crate) fn conflict(id: &RuleId) -> WakeShiftError {
    ConflictError {
        entity: "ConditionRule",
        id: id.to_string(),
    }
    .into()
}

pub(crate) fn not_found(id: &RuleId) -> WakeShiftError {
    NotFoundError {
        entity: "ConditionRule",
        id: id.to_string(),
    }
    .into()
}

/// `SQLite`-backed condition rule repository.
#[derive(Clone)]
pub struct SqliteRuleRepository {
    pool: SqlitePool,
}

impl SqliteRuleRepository {
    /// Create a new repository backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RuleRepository for SqliteRuleRepository {
    async fn create(&self, rule: ConditionRule) -> Result<ConditionRule, WakeShiftError> {
        let columns = Columns::of(&rule)?;

        sqlx::query(
                "INSERT INTO rules (id, name, rule_type, enabled, priority, condition, adjustment, score, samples, version, last_updated) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(rule.id.as_str())
            .bind(&rule.name)
            .bind(rule.rule_type.as_str())
            .bind(rule.enabled)
            .bind(columns.priority)
            .bind(&columns.condition)
            .bind(&columns.adjustment)
            .bind(columns.effectiveness.score)
            .bind(columns.effectiveness.samples)
            .bind(columns.effectiveness.version)
            .bind(&columns.effectiveness.last_updated)
            .execute(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => conflict(&rule.id),
                other => WakeShiftError::from(StorageError::from(other)),
            })?;

        Ok(rule)
    }

    async fn get_by_id(&self, id: &RuleId) -> Result<Option<ConditionRule>, WakeShiftError> {
        let row: Option<Wrapper> = sqlx::query_as("SELECT * FROM rules WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<ConditionRule>, WakeShiftError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM rules ORDER BY seq")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, rule: ConditionRule) -> Result<ConditionRule, WakeShiftError> {
        let columns = Columns::of(&rule)?;

        let row: Option<Wrapper> = sqlx::query_as(
                "UPDATE rules SET name = ?, rule_type = ?, enabled = ?, priority = ?, condition = ?, adjustment = ? WHERE id = ? RETURNING *",
            )
            .bind(&rule.name)
            .bind(rule.rule_type.as_str())
            .bind(rule.enabled)
            .bind(columns.priority)
            .bind(&columns.condition)
            .bind(&columns.adjustment)
            .bind(rule.id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Wrapper::maybe(row).ok_or_else(|| not_found(&rule.id))
    }

    async fn delete(&self, id: &RuleId) -> Result<(), WakeShiftError> {
        let result = sqlx::query("DELETE FROM rules WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
