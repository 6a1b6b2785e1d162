use crate::database::queries;
use crate::error::AppError;
use crate::utils::progress::ProgressTracker;
use crate::utils::{time, validation};
use crate::web::{AppState, user_id_from_headers};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBody {
    pub book_id: String,
    pub chapter: Option<i32>,
    pub year: Option<i32>,
    #[serde(default)]
    pub all: bool,
}

pub async fn toggle_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ToggleBody>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let year = body.year.unwrap_or_else(|| time::today_kst().year());
    validation::validate_year(year)?;

    let tracker = ProgressTracker::new(state.pool.clone());
    let action = if body.all {
        tracker.mark_book(&user_id, &body.book_id, year).await?
    } else {
        let chapter = body
            .chapter
            .ok_or_else(|| AppError::validation("장 번호가 필요합니다"))?;
        tracker
            .toggle_chapter(&user_id, &body.book_id, chapter, year)
            .await?
    };

    Ok(Json(json!({ "success": true, "action": action.as_str() })))
}

#[derive(Deserialize)]
pub struct ProgressParams {
    pub year: Option<i32>,
}

pub async fn get_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProgressParams>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let year = params.year.unwrap_or_else(|| time::today_kst().year());
    validation::validate_year(year)?;

    let entries = queries::get_progress_for_year(&state.pool, &user_id, year).await?;

    Ok(Json(json!({ "success": true, "data": entries })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionBody {
    pub plan_id: String,
    pub date: NaiveDate,
    pub memo: Option<String>,
}

pub async fn complete_reading(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CompletionBody>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let existing =
        queries::get_reading_completion(&state.pool, &user_id, &body.plan_id, body.date).await?;
    if existing.is_some() {
        return Err(AppError::validation("이미 완료 처리된 날짜입니다"));
    }

    let completion = queries::create_reading_completion(
        &state.pool,
        &user_id,
        &body.plan_id,
        body.date,
        body.memo.as_deref(),
    )
    .await?;

    Ok(Json(json!({ "success": true, "data": completion })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UncompleteBody {
    pub plan_id: String,
    pub date: NaiveDate,
}

pub async fn uncomplete_reading(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UncompleteBody>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let deleted =
        queries::delete_reading_completion(&state.pool, &user_id, &body.plan_id, body.date).await?;
    if deleted == 0 {
        return Err(AppError::not_found("완료 기록을 찾을 수 없습니다"));
    }

    Ok(Json(json!({ "success": true })))
}
