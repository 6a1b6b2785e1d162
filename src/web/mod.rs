pub mod checkin;
pub mod profile;
pub mod reading;

use crate::error::AppError;
use axum::Router;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/devotion/checkin",
            post(checkin::submit_checkin).delete(checkin::delete_checkin),
        )
        .route("/api/devotion/checkins", get(checkin::list_checkins))
        .route("/api/devotion/stats", get(checkin::checkin_stats))
        .route("/api/bible-reading/toggle", post(reading::toggle_progress))
        .route("/api/bible-reading/progress", get(reading::get_progress))
        .route(
            "/api/reading/complete",
            post(reading::complete_reading).delete(reading::uncomplete_reading),
        )
        .route("/api/profile", get(profile::get_profile))
        .route("/api/profile/increment-reads", post(profile::increment_reads))
        .route("/api/profile/password-changed", post(profile::password_changed))
        .with_state(state)
}

/// Authentication is delegated to the external identity layer in front of
/// this service; the authenticated subject arrives as an `x-user-id` header.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)
}
