use crate::database::queries;
use crate::error::AppError;
use crate::utils::checkin_writer::{CheckinInput, CheckinWriter};
use crate::utils::{streak, time};
use crate::web::{AppState, user_id_from_headers};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{Value, json};

pub async fn submit_checkin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CheckinInput>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let writer = CheckinWriter::new(state.pool.clone());
    let record = writer.save(&user_id, &input).await?;

    Ok(Json(json!({ "success": true, "data": record })))
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub date: Option<NaiveDate>,
    pub id: Option<i64>,
}

pub async fn delete_checkin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DeleteParams>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let writer = CheckinWriter::new(state.pool.clone());
    let deleted = match (params.id, params.date) {
        (Some(id), _) => writer.delete_by_id(&user_id, id).await?,
        (None, Some(date)) => writer.delete_by_date(&user_id, date).await?,
        (None, None) => return Err(AppError::validation("date 또는 id가 필요합니다")),
    };

    if deleted == 0 {
        return Err(AppError::not_found("체크인 기록을 찾을 수 없습니다"));
    }

    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct RangeParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn list_checkins(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RangeParams>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    // Default to the current (KST) calendar year.
    let today = time::today_kst();
    let from = params
        .from
        .or_else(|| NaiveDate::from_ymd_opt(today.year(), 1, 1))
        .ok_or_else(|| AppError::validation("올바른 조회 기간이 아닙니다"))?;
    let to = params
        .to
        .or_else(|| NaiveDate::from_ymd_opt(today.year(), 12, 31))
        .ok_or_else(|| AppError::validation("올바른 조회 기간이 아닙니다"))?;

    if from > to {
        return Err(AppError::validation("조회 시작일이 종료일보다 늦습니다"));
    }

    let records = queries::get_checkins_by_date_range(&state.pool, &user_id, from, to).await?;

    Ok(Json(json!({ "success": true, "data": records })))
}

pub async fn checkin_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let dates = queries::get_checkin_dates(&state.pool, &user_id).await?;
    let total_minutes = queries::total_checkin_minutes(&state.pool, &user_id).await?;
    let today = time::today_kst();

    Ok(Json(json!({
        "success": true,
        "data": {
            "currentStreak": streak::current_streak(&dates, today),
            "longestStreak": streak::longest_streak(&dates),
            "thisWeek": streak::count_this_week(&dates, today),
            "thisMonth": streak::count_this_month(&dates, today),
            "totalCheckins": dates.len(),
            "totalMinutes": total_minutes,
            "totalDuration": time::format_duration_minutes(total_minutes),
        }
    })))
}
