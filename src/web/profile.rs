use crate::database::queries;
use crate::error::AppError;
use crate::web::{AppState, user_id_from_headers};
use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};

pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let profile = queries::get_profile(&state.pool, &user_id)
        .await?
        .ok_or_else(|| AppError::not_found("프로필을 찾을 수 없습니다"))?;

    Ok(Json(json!({ "success": true, "data": profile })))
}

#[derive(Deserialize)]
pub struct IncrementBody {
    pub increment: Option<i64>,
}

/// Bumps the cumulative completed-readthrough counter.
pub async fn increment_reads(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<IncrementBody>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let by = body.increment.unwrap_or(1);
    if by < 1 {
        return Err(AppError::validation("증가 값은 1 이상이어야 합니다"));
    }

    let count = queries::increment_readthrough(&state.pool, &user_id, by).await?;

    Ok(Json(json!({ "success": true, "count": count })))
}

/// Called by the auth layer after a successful password change; clears the
/// first-login flag so the client stops forcing the change-password screen.
pub async fn password_changed(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    queries::mark_password_changed(&state.pool, &user_id).await?;

    Ok(Json(json!({ "success": true })))
}
