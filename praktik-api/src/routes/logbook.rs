use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{LogEntry, UserId},
    domain::WeeklyBundle,
    repositories::NewLogEntry,
    routes::ApiError,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/weeks", get(list_weeks))
        .route("/weeks/:week", get(week_bundle).delete(delete_week))
        .route("/weeks/:week/submit", post(submit_week))
        .route("/weeks/:week/approve", post(approve_week))
        .route("/weeks/:week/reject", post(reject_week))
}

fn parse_date(s: &str) -> Result<time::Date, ApiError> {
    let format = time::format_description::parse("[year]-[month]-[day]").unwrap();
    time::Date::parse(s, &format)
        .map_err(|_| ApiError::bad_request(format!("could not parse date: {}", s)))
}

fn parse_time(s: &str) -> Result<time::Time, ApiError> {
    let format = time::format_description::parse("[hour]:[minute]").unwrap();
    time::Time::parse(s, &format)
        .map_err(|_| ApiError::bad_request(format!("could not parse time: {}", s)))
}

#[derive(Debug, Deserialize)]
pub struct DateFilterQuery {
    from: String,
    to: String,
}

#[instrument(name = "list_entries", skip(app_state))]
async fn list_entries(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(date_filter): Query<DateFilterQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let from = parse_date(&date_filter.from)?;
    let to = parse_date(&date_filter.to)?;

    let entries = app_state
        .logbook_service
        .entries_in_range(user.id, from, to)
        .await?;

    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryPayload {
    entry_date: String,
    start_time: Option<String>,
    end_time: Option<String>,
    duration_minutes: i32,
    content: String,
    project_id: Option<i32>,
    task_id: Option<i32>,
    attachments: Option<Vec<String>>,
}

#[instrument(name = "create_entry", skip(app_state, payload))]
async fn create_entry(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateEntryPayload>,
) -> Result<(StatusCode, Json<LogEntry>), ApiError> {
    if payload.duration_minutes < 0 {
        return Err(ApiError::bad_request("duration cannot be negative"));
    }
    if payload.content.trim().is_empty() {
        return Err(ApiError::bad_request("content cannot be empty"));
    }

    let entry_date = parse_date(&payload.entry_date)?;
    let start_time = payload.start_time.as_deref().map(parse_time).transpose()?;
    let end_time = payload.end_time.as_deref().map(parse_time).transpose()?;

    let new_entry = NewLogEntry {
        user_id: user.id.as_i32(),
        project_id: payload.project_id,
        task_id: payload.task_id,
        entry_date,
        start_time,
        end_time,
        duration_minutes: payload.duration_minutes,
        content: payload.content,
        attachments: payload.attachments,
    };

    let created = app_state.logbook_service.create_entry(&new_entry).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    user_id: Option<i32>,
}

/// Resolve whose logbook is being read and check the caller may see it.
async fn resolve_owner(
    app_state: &AppState,
    user: &AuthUser,
    requested: Option<i32>,
) -> Result<UserId, ApiError> {
    let owner = requested.map(UserId::from).unwrap_or(user.id);

    if !app_state.logbook_service.can_view(user, owner).await? {
        return Err(ApiError::forbidden("not permitted to view this logbook"));
    }

    Ok(owner)
}

#[instrument(name = "list_weeks", skip(app_state))]
async fn list_weeks(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<u32>>, ApiError> {
    let owner = resolve_owner(&app_state, &user, query.user_id).await?;
    let weeks = app_state.logbook_service.tagged_week_list(owner).await?;

    Ok(Json(weeks))
}

#[instrument(name = "week_bundle", skip(app_state))]
async fn week_bundle(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(week): Path<u32>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<WeeklyBundle>, ApiError> {
    let owner = resolve_owner(&app_state, &user, query.user_id).await?;
    let bundle = app_state.logbook_service.week_bundle(owner, week).await?;

    Ok(Json(bundle))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWeekPayload {
    from: String,
    to: String,
}

#[instrument(name = "submit_week", skip(app_state, payload))]
async fn submit_week(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(week): Path<u32>,
    Json(payload): Json<SubmitWeekPayload>,
) -> Result<Json<WeeklyBundle>, ApiError> {
    let from = parse_date(&payload.from)?;
    let to = parse_date(&payload.to)?;
    if from > to {
        return Err(ApiError::bad_request("date range is inverted"));
    }

    let bundle = app_state
        .logbook_service
        .submit_week(&user, week, (from, to))
        .await?;

    Ok(Json(bundle))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveWeekPayload {
    user_id: i32,
}

#[instrument(name = "approve_week", skip(app_state))]
async fn approve_week(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(week): Path<u32>,
    Json(payload): Json<ApproveWeekPayload>,
) -> Result<Json<WeeklyBundle>, ApiError> {
    let bundle = app_state
        .logbook_service
        .approve_week(&user, UserId::from(payload.user_id), week)
        .await?;

    Ok(Json(bundle))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectWeekPayload {
    user_id: i32,
    reason: Option<String>,
}

#[instrument(name = "reject_week", skip(app_state, payload))]
async fn reject_week(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(week): Path<u32>,
    Json(payload): Json<RejectWeekPayload>,
) -> Result<Json<WeeklyBundle>, ApiError> {
    let bundle = app_state
        .logbook_service
        .reject_week(&user, UserId::from(payload.user_id), week, payload.reason)
        .await?;

    Ok(Json(bundle))
}

#[instrument(name = "delete_week", skip(app_state))]
async fn delete_week(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(week): Path<u32>,
) -> Result<StatusCode, ApiError> {
    app_state.logbook_service.delete_week(&user, week).await?;

    Ok(StatusCode::NO_CONTENT)
}
