use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String, // "user", "leader" or "admin"
    pub share_with_leaders: bool,
    pub cumulative_readthrough_count: i64,
    pub is_locked: bool,
    pub first_login: bool,
    pub last_password_change: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of devotional time for a user on a calendar date.
///
/// Clock times are stored as zero-padded `HH:MM` strings; a primary record
/// whose interval crossed midnight holds the `24:00` sentinel in `end_time`
/// and owns a child record (`parent_id`) dated the next day.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CheckinRecord {
    pub id: i64,
    pub user_id: String,
    pub plan_id: Option<String>,
    pub checkin_date: NaiveDate,
    pub planned_start_time: Option<String>,
    pub planned_end_time: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub memo: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BibleProgressEntry {
    pub id: i64,
    pub user_id: String,
    pub book_id: String,
    pub chapter: i32,
    pub year: i32,
    pub completed_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ReadingCompletion {
    pub id: i64,
    pub user_id: String,
    pub plan_id: String,
    pub date: NaiveDate,
    pub memo: Option<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Leader,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Leader => "leader",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "leader" => Some(Role::Leader),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl CheckinRecord {
    /// True for the materialized next-day half of a spanning check-in.
    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_roundtrip() {
        for role in [Role::User, Role::Leader, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("owner"), None);
    }
}
