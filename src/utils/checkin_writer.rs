use crate::database::models::CheckinRecord;
use crate::error::AppError;
use crate::utils::{time, validation};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{Row, SqlitePool};

/// Sentinel stored in `end_time` when the logged interval crosses midnight.
pub const END_OF_DAY: &str = "24:00";
/// Start time of the materialized next-day half.
pub const START_OF_DAY: &str = "00:00";

/// User-submitted check-in payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinInput {
    pub id: Option<i64>,
    pub checkin_date: NaiveDate,
    pub plan_id: Option<String>,
    pub planned_start_time: Option<String>,
    pub planned_end_time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub memo: Option<String>,
}

impl CheckinInput {
    /// An end clock-time numerically below the start means the activity
    /// crossed into the next calendar day. Lexicographic comparison is valid
    /// because both sides are zero-padded `HH:MM`.
    fn spans_midnight(&self) -> bool {
        matches!(
            (self.start_time.as_deref(), self.end_time.as_deref()),
            (Some(start), Some(end)) if start > end
        )
    }
}

/// Persists check-ins, transparently splitting a midnight-spanning interval
/// into a primary record plus a linked next-day record, and retracting the
/// next-day half when a later edit no longer spans midnight.
pub struct CheckinWriter {
    pool: SqlitePool,
}

impl CheckinWriter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert one check-in. The primary write and the dependent child
    /// write/delete happen in a single transaction, so a failure leaves no
    /// half-split state behind.
    pub async fn save(&self, user_id: &str, input: &CheckinInput) -> Result<CheckinRecord, AppError> {
        validation::validate_checkin(input, time::today_kst())?;

        let spans = input.spans_midnight();
        let stored_end = if spans {
            Some(END_OF_DAY)
        } else {
            input.end_time.as_deref()
        };

        let mut tx = self.pool.begin().await?;

        let primary_id = match input.id {
            Some(id) => {
                let existing = sqlx::query(
                    "SELECT id FROM devotion_checkins
                     WHERE id = ? AND user_id = ? AND parent_id IS NULL",
                )
                .bind(id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

                if existing.is_none() {
                    return Err(AppError::not_found("체크인 기록을 찾을 수 없습니다"));
                }

                Self::update_record(&mut tx, id, input, stored_end).await?;
                id
            }
            None => {
                let existing = sqlx::query(
                    "SELECT id FROM devotion_checkins
                     WHERE user_id = ? AND checkin_date = ? AND parent_id IS NULL",
                )
                .bind(user_id)
                .bind(input.checkin_date)
                .fetch_optional(&mut *tx)
                .await?;

                match existing {
                    Some(row) => {
                        let id: i64 = row.get("id");
                        Self::update_record(&mut tx, id, input, stored_end).await?;
                        id
                    }
                    None => {
                        let result = sqlx::query(
                            "INSERT INTO devotion_checkins
                             (user_id, plan_id, checkin_date, planned_start_time, planned_end_time,
                              start_time, end_time, duration_minutes, memo)
                             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                        )
                        .bind(user_id)
                        .bind(&input.plan_id)
                        .bind(input.checkin_date)
                        .bind(&input.planned_start_time)
                        .bind(&input.planned_end_time)
                        .bind(&input.start_time)
                        .bind(stored_end)
                        .bind(input.duration_minutes)
                        .bind(&input.memo)
                        .execute(&mut *tx)
                        .await?;

                        result.last_insert_rowid()
                    }
                }
            }
        };

        if spans {
            Self::upsert_child(&mut tx, user_id, primary_id, input).await?;
        } else {
            // An earlier edit may have materialized a next-day half.
            sqlx::query("DELETE FROM devotion_checkins WHERE parent_id = ?")
                .bind(primary_id)
                .execute(&mut *tx)
                .await?;
        }

        let record = sqlx::query_as::<_, CheckinRecord>(
            "SELECT id, user_id, plan_id, checkin_date, planned_start_time, planned_end_time,
                    start_time, end_time, duration_minutes, memo, parent_id, created_at, updated_at
             FROM devotion_checkins WHERE id = ?",
        )
        .bind(primary_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Saved check-in: user={}, date={}, spans_midnight={}",
            user_id,
            input.checkin_date,
            spans
        );

        Ok(record)
    }

    async fn update_record(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        id: i64,
        input: &CheckinInput,
        stored_end: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE devotion_checkins
             SET plan_id = ?, checkin_date = ?, planned_start_time = ?, planned_end_time = ?,
                 start_time = ?, end_time = ?, duration_minutes = ?, memo = ?,
                 updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(&input.plan_id)
        .bind(input.checkin_date)
        .bind(&input.planned_start_time)
        .bind(&input.planned_end_time)
        .bind(&input.start_time)
        .bind(stored_end)
        .bind(input.duration_minutes)
        .bind(&input.memo)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Create or refresh the next-day half of a spanning check-in.
    async fn upsert_child(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        user_id: &str,
        primary_id: i64,
        input: &CheckinInput,
    ) -> Result<(), AppError> {
        let next_date = time::next_day(input.checkin_date)
            .ok_or_else(|| AppError::validation("날짜 범위를 벗어났습니다"))?;

        let existing = sqlx::query("SELECT id FROM devotion_checkins WHERE parent_id = ?")
            .bind(primary_id)
            .fetch_optional(&mut **tx)
            .await?;

        match existing {
            Some(row) => {
                let child_id: i64 = row.get("id");
                sqlx::query(
                    "UPDATE devotion_checkins
                     SET plan_id = ?, checkin_date = ?, start_time = ?, end_time = ?,
                         duration_minutes = ?, memo = ?, updated_at = CURRENT_TIMESTAMP
                     WHERE id = ?",
                )
                .bind(&input.plan_id)
                .bind(next_date)
                .bind(START_OF_DAY)
                .bind(&input.end_time)
                .bind(input.duration_minutes)
                .bind(&input.memo)
                .bind(child_id)
                .execute(&mut **tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO devotion_checkins
                     (user_id, plan_id, checkin_date, start_time, end_time,
                      duration_minutes, memo, parent_id)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(user_id)
                .bind(&input.plan_id)
                .bind(next_date)
                .bind(START_OF_DAY)
                .bind(&input.end_time)
                .bind(input.duration_minutes)
                .bind(&input.memo)
                .bind(primary_id)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }

    /// Delete the primary record for a calendar date. The next-day half, if
    /// any, goes with it via the FK cascade.
    pub async fn delete_by_date(&self, user_id: &str, date: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM devotion_checkins
             WHERE user_id = ? AND checkin_date = ? AND parent_id IS NULL",
        )
        .bind(user_id)
        .bind(date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(&self, user_id: &str, checkin_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM devotion_checkins WHERE id = ? AND user_id = ?")
            .bind(checkin_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
