use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    create_user_profiles_table(pool).await?;
    create_devotion_checkins_table(pool).await?;
    create_bible_progress_table(pool).await?;
    create_reading_completions_table(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}

async fn create_user_profiles_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'leader', 'admin')),
            share_with_leaders BOOLEAN NOT NULL DEFAULT FALSE,
            cumulative_readthrough_count INTEGER NOT NULL DEFAULT 0,
            is_locked BOOLEAN NOT NULL DEFAULT FALSE,
            first_login BOOLEAN NOT NULL DEFAULT TRUE,
            last_password_change DATETIME,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_devotion_checkins_table(pool: &SqlitePool) -> Result<()> {
    // user_id references the external identity provider, so no FK there.
    // parent_id links the next-day half of a midnight-spanning check-in
    // to its primary record.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS devotion_checkins (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            plan_id TEXT,
            checkin_date DATE NOT NULL,
            planned_start_time TEXT,
            planned_end_time TEXT,
            start_time TEXT,
            end_time TEXT,
            duration_minutes INTEGER,
            memo TEXT,
            parent_id INTEGER,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (parent_id) REFERENCES devotion_checkins (id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One primary record per user and calendar date; child records are
    // exempt so a spanning check-in can coexist with the next day's own.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_checkins_user_date_primary
        ON devotion_checkins (user_id, checkin_date)
        WHERE parent_id IS NULL
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_checkins_parent
        ON devotion_checkins (parent_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_bible_progress_table(pool: &SqlitePool) -> Result<()> {
    // deleted_at is a soft-delete tombstone: toggling a chapter off and on
    // again must preserve the original completed_at.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_bible_progress (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            book_id TEXT NOT NULL,
            chapter INTEGER NOT NULL,
            year INTEGER NOT NULL,
            completed_at DATETIME NOT NULL,
            deleted_at DATETIME,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user_id, book_id, chapter, year)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_reading_completions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_reading_completions (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            plan_id TEXT NOT NULL,
            date DATE NOT NULL,
            memo TEXT,
            completed_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (user_id, plan_id, date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
