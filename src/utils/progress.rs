use crate::bible;
use crate::error::AppError;
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Added,
    Removed,
    BulkAdded,
    BulkRemoved,
}

impl ToggleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleAction::Added => "added",
            ToggleAction::Removed => "removed",
            ToggleAction::BulkAdded => "bulk_added",
            ToggleAction::BulkRemoved => "bulk_removed",
        }
    }
}

/// Bible reading progress, tracked per (user, book, chapter, year).
///
/// Completion marks are soft-deleted: toggling a chapter off stamps
/// `deleted_at` instead of removing the row, so toggling it back on
/// restores the original `completed_at`.
pub struct ProgressTracker {
    pool: SqlitePool,
}

impl ProgressTracker {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn toggle_chapter(
        &self,
        user_id: &str,
        book_id: &str,
        chapter: i32,
        year: i32,
    ) -> Result<ToggleAction, AppError> {
        let book = bible::find_book(book_id)
            .ok_or_else(|| AppError::not_found("존재하지 않는 성경입니다"))?;

        if !(1..=book.chapters).contains(&chapter) {
            return Err(AppError::validation("올바른 장 번호가 아닙니다"));
        }

        let existing = sqlx::query(
            "SELECT id, deleted_at IS NULL AS is_live FROM user_bible_progress
             WHERE user_id = ? AND book_id = ? AND chapter = ? AND year = ?",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(chapter)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        let action = match existing {
            Some(row) => {
                let id: i64 = row.get("id");
                let is_live: bool = row.get("is_live");
                if is_live {
                    sqlx::query(
                        "UPDATE user_bible_progress SET deleted_at = CURRENT_TIMESTAMP WHERE id = ?",
                    )
                    .bind(id)
                    .execute(&self.pool)
                    .await?;
                    ToggleAction::Removed
                } else {
                    // Revive the tombstoned row; completed_at stays untouched.
                    sqlx::query("UPDATE user_bible_progress SET deleted_at = NULL WHERE id = ?")
                        .bind(id)
                        .execute(&self.pool)
                        .await?;
                    ToggleAction::Added
                }
            }
            None => {
                sqlx::query(
                    "INSERT INTO user_bible_progress (user_id, book_id, chapter, year, completed_at)
                     VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP)",
                )
                .bind(user_id)
                .bind(book_id)
                .bind(chapter)
                .bind(year)
                .execute(&self.pool)
                .await?;
                ToggleAction::Added
            }
        };

        Ok(action)
    }

    /// Bulk mark for a whole book: a fully-read book is unmarked entirely,
    /// a partially-read book gets only its missing chapters filled in.
    pub async fn mark_book(
        &self,
        user_id: &str,
        book_id: &str,
        year: i32,
    ) -> Result<ToggleAction, AppError> {
        let book = bible::find_book(book_id)
            .ok_or_else(|| AppError::not_found("존재하지 않는 성경입니다"))?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT COUNT(*) AS live FROM user_bible_progress
             WHERE user_id = ? AND book_id = ? AND year = ? AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(year)
        .fetch_one(&mut *tx)
        .await?;
        let live_count: i64 = row.get("live");

        let action = if live_count == book.chapters as i64 {
            sqlx::query(
                "UPDATE user_bible_progress SET deleted_at = CURRENT_TIMESTAMP
                 WHERE user_id = ? AND book_id = ? AND year = ? AND deleted_at IS NULL",
            )
            .bind(user_id)
            .bind(book_id)
            .bind(year)
            .execute(&mut *tx)
            .await?;
            ToggleAction::BulkRemoved
        } else {
            // Revive every tombstoned chapter, then insert the ones that
            // have never been touched. Live rows keep their completed_at.
            sqlx::query(
                "UPDATE user_bible_progress SET deleted_at = NULL
                 WHERE user_id = ? AND book_id = ? AND year = ? AND deleted_at IS NOT NULL",
            )
            .bind(user_id)
            .bind(book_id)
            .bind(year)
            .execute(&mut *tx)
            .await?;

            for chapter in 1..=book.chapters {
                sqlx::query(
                    "INSERT INTO user_bible_progress (user_id, book_id, chapter, year, completed_at)
                     SELECT ?, ?, ?, ?, CURRENT_TIMESTAMP
                     WHERE NOT EXISTS (
                         SELECT 1 FROM user_bible_progress
                         WHERE user_id = ? AND book_id = ? AND chapter = ? AND year = ?
                     )",
                )
                .bind(user_id)
                .bind(book_id)
                .bind(chapter)
                .bind(year)
                .bind(user_id)
                .bind(book_id)
                .bind(chapter)
                .bind(year)
                .execute(&mut *tx)
                .await?;
            }
            ToggleAction::BulkAdded
        };

        tx.commit().await?;

        tracing::info!(
            "Bulk progress mark: user={}, book={}, year={}, action={}",
            user_id,
            book_id,
            year,
            action.as_str()
        );

        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::BibleProgressEntry;
    use crate::database::{migrations, queries};
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn setup_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn get_entry(
        pool: &SqlitePool,
        user_id: &str,
        book_id: &str,
        chapter: i32,
        year: i32,
    ) -> Option<BibleProgressEntry> {
        sqlx::query_as::<_, BibleProgressEntry>(
            "SELECT id, user_id, book_id, chapter, year, completed_at, deleted_at, created_at
             FROM user_bible_progress
             WHERE user_id = ? AND book_id = ? AND chapter = ? AND year = ?",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(chapter)
        .bind(year)
        .fetch_optional(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn toggle_cycle_preserves_completed_at() {
        let pool = setup_pool().await;
        let tracker = ProgressTracker::new(pool.clone());

        let action = tracker.toggle_chapter("u1", "ruth", 1, 2026).await.unwrap();
        assert_eq!(action, ToggleAction::Added);
        let first = get_entry(&pool, "u1", "ruth", 1, 2026).await.unwrap();
        assert!(first.deleted_at.is_none());

        let action = tracker.toggle_chapter("u1", "ruth", 1, 2026).await.unwrap();
        assert_eq!(action, ToggleAction::Removed);
        let off = get_entry(&pool, "u1", "ruth", 1, 2026).await.unwrap();
        assert!(off.deleted_at.is_some());

        let action = tracker.toggle_chapter("u1", "ruth", 1, 2026).await.unwrap();
        assert_eq!(action, ToggleAction::Added);
        let revived = get_entry(&pool, "u1", "ruth", 1, 2026).await.unwrap();
        assert!(revived.deleted_at.is_none());
        assert_eq!(revived.completed_at, first.completed_at);
        assert_eq!(revived.id, first.id);
    }

    #[tokio::test]
    async fn live_rows_only_in_year_listing() {
        let pool = setup_pool().await;
        let tracker = ProgressTracker::new(pool.clone());

        tracker.toggle_chapter("u1", "ruth", 1, 2026).await.unwrap();
        tracker.toggle_chapter("u1", "ruth", 2, 2026).await.unwrap();
        tracker.toggle_chapter("u1", "ruth", 2, 2026).await.unwrap(); // off again

        let live = queries::get_progress_for_year(&pool, "u1", 2026).await.unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].chapter, 1);
    }

    #[tokio::test]
    async fn toggle_rejects_unknown_book_and_chapter() {
        let pool = setup_pool().await;
        let tracker = ProgressTracker::new(pool.clone());

        let err = tracker.toggle_chapter("u1", "enoch", 1, 2026).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = tracker.toggle_chapter("u1", "ruth", 5, 2026).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn mark_book_fills_in_missing_chapters() {
        let pool = setup_pool().await;
        let tracker = ProgressTracker::new(pool.clone());

        // Chapter 1 live, chapter 2 tombstoned, chapters 3-4 untouched.
        tracker.toggle_chapter("u1", "ruth", 1, 2026).await.unwrap();
        tracker.toggle_chapter("u1", "ruth", 2, 2026).await.unwrap();
        tracker.toggle_chapter("u1", "ruth", 2, 2026).await.unwrap();

        let ch1_before = get_entry(&pool, "u1", "ruth", 1, 2026).await.unwrap();
        let ch2_before = get_entry(&pool, "u1", "ruth", 2, 2026).await.unwrap();

        let action = tracker.mark_book("u1", "ruth", 2026).await.unwrap();
        assert_eq!(action, ToggleAction::BulkAdded);

        let live = queries::get_progress_for_year(&pool, "u1", 2026).await.unwrap();
        assert_eq!(live.len(), 4);

        let ch1 = get_entry(&pool, "u1", "ruth", 1, 2026).await.unwrap();
        let ch2 = get_entry(&pool, "u1", "ruth", 2, 2026).await.unwrap();
        assert_eq!(ch1.completed_at, ch1_before.completed_at);
        assert_eq!(ch2.completed_at, ch2_before.completed_at);
    }

    #[tokio::test]
    async fn mark_book_on_complete_book_unmarks_all() {
        let pool = setup_pool().await;
        let tracker = ProgressTracker::new(pool.clone());

        let action = tracker.mark_book("u1", "ruth", 2026).await.unwrap();
        assert_eq!(action, ToggleAction::BulkAdded);
        assert_eq!(
            queries::get_progress_for_year(&pool, "u1", 2026).await.unwrap().len(),
            4
        );

        let action = tracker.mark_book("u1", "ruth", 2026).await.unwrap();
        assert_eq!(action, ToggleAction::BulkRemoved);
        assert!(queries::get_progress_for_year(&pool, "u1", 2026).await.unwrap().is_empty());

        // Tombstoned history is still there.
        assert!(get_entry(&pool, "u1", "ruth", 1, 2026).await.is_some());
    }

    #[tokio::test]
    async fn progress_is_scoped_per_year() {
        let pool = setup_pool().await;
        let tracker = ProgressTracker::new(pool.clone());

        tracker.toggle_chapter("u1", "jude", 1, 2025).await.unwrap();
        tracker.toggle_chapter("u1", "jude", 1, 2026).await.unwrap();

        assert_eq!(queries::get_progress_for_year(&pool, "u1", 2025).await.unwrap().len(), 1);
        assert_eq!(queries::get_progress_for_year(&pool, "u1", 2026).await.unwrap().len(), 1);
    }
}
