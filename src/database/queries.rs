use crate::database::models::{BibleProgressEntry, CheckinRecord, ReadingCompletion, UserProfile};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

// User profile queries

pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        "SELECT id, email, full_name, role, share_with_leaders, cumulative_readthrough_count,
                is_locked, first_login, last_password_change, created_at, updated_at
         FROM user_profiles WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_profile(
    pool: &SqlitePool,
    user_id: &str,
    email: &str,
    full_name: &str,
    role: &str,
) -> Result<UserProfile, sqlx::Error> {
    sqlx::query("INSERT INTO user_profiles (id, email, full_name, role) VALUES (?, ?, ?, ?)")
        .bind(user_id)
        .bind(email)
        .bind(full_name)
        .bind(role)
        .execute(pool)
        .await?;

    sqlx::query_as::<_, UserProfile>(
        "SELECT id, email, full_name, role, share_with_leaders, cumulative_readthrough_count,
                is_locked, first_login, last_password_change, created_at, updated_at
         FROM user_profiles WHERE id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Read-modify-write of the cumulative readthrough counter; returns the new value.
pub async fn increment_readthrough(
    pool: &SqlitePool,
    user_id: &str,
    by: i64,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT cumulative_readthrough_count FROM user_profiles WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    let current: i64 = row.get("cumulative_readthrough_count");
    let new_count = current + by;

    sqlx::query(
        "UPDATE user_profiles
         SET cumulative_readthrough_count = ?, updated_at = CURRENT_TIMESTAMP
         WHERE id = ?",
    )
    .bind(new_count)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(new_count)
}

/// Clears the first-login flag after a successful password change.
pub async fn mark_password_changed(pool: &SqlitePool, user_id: &str) -> Result<(), sqlx::Error> {
    let result = sqlx::query(
        "UPDATE user_profiles
         SET first_login = FALSE, last_password_change = CURRENT_TIMESTAMP,
             updated_at = CURRENT_TIMESTAMP
         WHERE id = ?",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }

    Ok(())
}

// Check-in queries

pub async fn get_checkins_by_date_range(
    pool: &SqlitePool,
    user_id: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<CheckinRecord>, sqlx::Error> {
    sqlx::query_as::<_, CheckinRecord>(
        "SELECT id, user_id, plan_id, checkin_date, planned_start_time, planned_end_time,
                start_time, end_time, duration_minutes, memo, parent_id, created_at, updated_at
         FROM devotion_checkins
         WHERE user_id = ? AND checkin_date >= ? AND checkin_date <= ?
         ORDER BY checkin_date ASC, id ASC",
    )
    .bind(user_id)
    .bind(start_date)
    .bind(end_date)
    .fetch_all(pool)
    .await
}

/// Distinct check-in dates for the streak calculator, child records included.
pub async fn get_checkin_dates(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<NaiveDate>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT DISTINCT checkin_date FROM devotion_checkins
         WHERE user_id = ?
         ORDER BY checkin_date ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|row| row.get("checkin_date")).collect())
}

pub async fn total_checkin_minutes(pool: &SqlitePool, user_id: &str) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        "SELECT COALESCE(SUM(duration_minutes), 0) AS total
         FROM devotion_checkins
         WHERE user_id = ? AND parent_id IS NULL",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.get("total"))
}

// Bible progress queries

pub async fn get_progress_for_year(
    pool: &SqlitePool,
    user_id: &str,
    year: i32,
) -> Result<Vec<BibleProgressEntry>, sqlx::Error> {
    sqlx::query_as::<_, BibleProgressEntry>(
        "SELECT id, user_id, book_id, chapter, year, completed_at, deleted_at, created_at
         FROM user_bible_progress
         WHERE user_id = ? AND year = ? AND deleted_at IS NULL
         ORDER BY book_id ASC, chapter ASC",
    )
    .bind(user_id)
    .bind(year)
    .fetch_all(pool)
    .await
}

// Reading completion queries

pub async fn get_reading_completion(
    pool: &SqlitePool,
    user_id: &str,
    plan_id: &str,
    date: NaiveDate,
) -> Result<Option<ReadingCompletion>, sqlx::Error> {
    sqlx::query_as::<_, ReadingCompletion>(
        "SELECT id, user_id, plan_id, date, memo, completed_at
         FROM user_reading_completions
         WHERE user_id = ? AND plan_id = ? AND date = ?",
    )
    .bind(user_id)
    .bind(plan_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

pub async fn create_reading_completion(
    pool: &SqlitePool,
    user_id: &str,
    plan_id: &str,
    date: NaiveDate,
    memo: Option<&str>,
) -> Result<ReadingCompletion, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO user_reading_completions (user_id, plan_id, date, memo)
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(plan_id)
    .bind(date)
    .bind(memo)
    .execute(pool)
    .await?;

    let completion_id = result.last_insert_rowid();

    sqlx::query_as::<_, ReadingCompletion>(
        "SELECT id, user_id, plan_id, date, memo, completed_at
         FROM user_reading_completions WHERE id = ?",
    )
    .bind(completion_id)
    .fetch_one(pool)
    .await
}

pub async fn delete_reading_completion(
    pool: &SqlitePool,
    user_id: &str,
    plan_id: &str,
    date: NaiveDate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM user_reading_completions WHERE user_id = ? AND plan_id = ? AND date = ?",
    )
    .bind(user_id)
    .bind(plan_id)
    .bind(date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
