use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::models::{CalendarEvent, CalendarEventPayload, CreateDayMemo, DayMemo};
use crate::db::DayMemoRepository;
use crate::error::{AppError, AppResult};
use crate::routes::auth::AuthUser;
use crate::services::calendar::CalendarService;
use crate::services::layout::MonthGrid;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/month", get(month_view).delete(clear_month))
        .route("/events", get(month_events).post(create_event))
        .route("/events/:id", put(update_event).delete(delete_event))
        .route("/memos", post(create_memo))
        .route("/memos/:id", delete(delete_memo))
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// The derived month view: one cell per grid day with capped,
/// lane-assigned items.
async fn month_view(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthGrid>> {
    let grid = CalendarService::month_view(&state, &employee.id, query.year, query.month).await?;
    Ok(Json(grid))
}

/// Raw events intersecting the requested month.
async fn month_events(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<CalendarEvent>>> {
    let events =
        CalendarService::month_events(&state, &employee.id, query.year, query.month).await?;
    Ok(Json(events))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Json(payload): Json<CalendarEventPayload>,
) -> AppResult<Json<CalendarEvent>> {
    let event = CalendarService::create_event(&state, &employee.id, payload).await?;
    Ok(Json(event))
}

async fn update_event(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CalendarEventPayload>,
) -> AppResult<Json<CalendarEvent>> {
    let event = CalendarService::update_event(&state, &employee.id, &id, payload).await?;
    Ok(Json(event))
}

async fn delete_event(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    CalendarService::delete_event(&state, &employee.id, &id).await?;
    Ok(Json(json!({ "message": "Event deleted" })))
}

/// Delete all of the employee's events keyed into one month.
async fn clear_month(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let removed =
        CalendarService::clear_month(&state, &employee.id, query.year, query.month).await?;
    Ok(Json(json!({ "deleted": removed })))
}

async fn create_memo(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Json(create): Json<CreateDayMemo>,
) -> AppResult<Json<DayMemo>> {
    if create.body.trim().is_empty() {
        return Err(AppError::Validation("Memo text is required".to_string()));
    }

    let memo = DayMemoRepository::create(&state.db, &employee.id, &create).await?;
    Ok(Json(memo))
}

async fn delete_memo(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = DayMemoRepository::delete(&state.db, &employee.id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Memo {} not found", id)));
    }
    Ok(Json(json!({ "message": "Memo deleted" })))
}
