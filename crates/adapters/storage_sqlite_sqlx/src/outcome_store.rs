//! `SQLite` implementation of [`OutcomeStore`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use wakeshift_app::ports::OutcomeStore;
use wakeshift_domain::effectiveness::EffectivenessUpdate;
use wakeshift_domain::error::WakeShiftError;
use wakeshift_domain::id::{OutcomeId, RuleId};
use wakeshift_domain::outcome::Outcome;

use crate::error::{StorageError, decode};
use crate::rule_repo::{EffectivenessColumns, conflict, not_found, version_column};

struct Wrapper(Outcome);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let fired_json: String = row.try_get("fired_rule_ids")?;
        let signal_json: String = row.try_get("signal")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        Ok(Self(Outcome {
            id: OutcomeId::from_str(&id).map_err(decode)?,
            fired_rule_ids: serde_json::from_str(&fired_json).map_err(decode)?,
            signal: serde_json::from_str(&signal_json).map_err(decode)?,
            recorded_at: chrono::DateTime::parse_from_rfc3339(&recorded_at)
                .map_err(decode)?
                .to_utc(),
        }))
    }
}

fn as_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// `SQLite`-backed append-only outcome history.
///
/// Recording an outcome also writes the effectiveness columns of the rules
/// it scored, inside one transaction.
#[derive(Clone)]
pub struct SqliteOutcomeStore {
    pool: SqlitePool,
}

impl SqliteOutcomeStore {
    /// Create a new store backed by the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl OutcomeStore for SqliteOutcomeStore {
    async fn record(
        &self,
        outcome: Outcome,
        updates: &[EffectivenessUpdate],
    ) -> Result<Outcome, WakeShiftError> {
        let fired_json =
            serde_json::to_string(&outcome.fired_rule_ids).map_err(StorageError::from)?;
        let signal_json = serde_json::to_string(&outcome.signal).map_err(StorageError::from)?;

        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        for update in updates {
            let columns = EffectivenessColumns::of(&update.current);
            let result = sqlx::query(
                "UPDATE rules SET score = ?, samples = ?, version = ?, last_updated = ? WHERE id = ? AND version = ?",
            )
            .bind(columns.score)
            .bind(columns.samples)
            .bind(columns.version)
            .bind(&columns.last_updated)
            .bind(update.rule_id.as_str())
            .bind(version_column(update.previous.version))
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                // dropping `tx` rolls back the updates already applied
                let stored: Option<i64> = sqlx::query_scalar("SELECT version FROM rules WHERE id = ?")
                    .bind(update.rule_id.as_str())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(StorageError::from)?;
                return Err(match stored {
                    Some(_) => conflict(&update.rule_id),
                    None => not_found(&update.rule_id),
                });
            }
        }

        sqlx::query(
            "INSERT INTO outcomes (id, fired_rule_ids, signal, recorded_at) VALUES (?, ?, ?, ?)",
        )
        .bind(outcome.id.to_string())
        .bind(&fired_json)
        .bind(&signal_json)
        .bind(outcome.recorded_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;

        Ok(outcome)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Outcome>, WakeShiftError> {
        let rows: Vec<Wrapper> = sqlx::query_as("SELECT * FROM outcomes ORDER BY seq DESC LIMIT ?")
            .bind(as_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_by_rule(&self, rule_id: &RuleId, limit: usize) -> Result<Vec<Outcome>, WakeShiftError> {
        let rows: Vec<Wrapper> = sqlx::query_as(
            "SELECT * FROM outcomes WHERE EXISTS (SELECT 1 FROM json_each(outcomes.fired_rule_ids) WHERE json_each.value = ?) ORDER BY seq DESC LIMIT ?",
        )
        .bind(rule_id.as_str())
        .bind(as_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}
