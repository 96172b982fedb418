use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CalendarEvent, CalendarEventPayload};
use crate::error::{AppError, AppResult};

/// Repository for work-calendar events (`calendar_events` table).
///
/// The store holds one document per event, scoped to an employee. `day_key`
/// is always re-derived from the start date on writes so the grouping key
/// can never drift from the range it indexes.
pub struct CalendarEventRepository;

impl CalendarEventRepository {
    /// All events for one employee, ordered for stable rendering.
    pub async fn list_for_employee(
        pool: &SqlitePool,
        employee_id: &str,
    ) -> AppResult<Vec<CalendarEvent>> {
        let rows = sqlx::query_as::<_, CalendarEvent>(
            r#"
            SELECT id, employee_id, title, category, body,
                   start_date, end_date, day_key, created_at, updated_at
            FROM calendar_events
            WHERE employee_id = ?
            ORDER BY start_date, id
            "#,
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// Create an event, generating its id and grouping key. Returns the
    /// stored row including the generated id.
    pub async fn create(
        pool: &SqlitePool,
        employee_id: &str,
        payload: &CalendarEventPayload,
    ) -> AppResult<CalendarEvent> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();
        let day_key = payload.start_date.format("%Y-%m-%d").to_string();

        let row = sqlx::query_as::<_, CalendarEvent>(
            r#"
            INSERT INTO calendar_events (
                id, employee_id, title, category, body,
                start_date, end_date, day_key, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, employee_id, title, category, body,
                      start_date, end_date, day_key, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(employee_id)
        .bind(&payload.title)
        .bind(&payload.category)
        .bind(payload.body.clone().unwrap_or_default())
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(day_key)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Replace an event's fields under its existing id. Last write wins;
    /// there is no version check. Returns `None` when no event with that
    /// id belongs to the employee.
    pub async fn update(
        pool: &SqlitePool,
        employee_id: &str,
        id: &str,
        payload: &CalendarEventPayload,
    ) -> AppResult<Option<CalendarEvent>> {
        let now = Utc::now().naive_utc();
        let day_key = payload.start_date.format("%Y-%m-%d").to_string();

        let row = sqlx::query_as::<_, CalendarEvent>(
            r#"
            UPDATE calendar_events
            SET title = ?, category = ?, body = ?,
                start_date = ?, end_date = ?, day_key = ?, updated_at = ?
            WHERE id = ? AND employee_id = ?
            RETURNING id, employee_id, title, category, body,
                      start_date, end_date, day_key, created_at, updated_at
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.category)
        .bind(payload.body.clone().unwrap_or_default())
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(day_key)
        .bind(now)
        .bind(id)
        .bind(employee_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Delete one event. Returns whether a row was removed.
    pub async fn delete(pool: &SqlitePool, employee_id: &str, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = ? AND employee_id = ?")
            .bind(id)
            .bind(employee_id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every event of one employee keyed into the given month
    /// (inclusive first/last day). Returns the number of rows removed.
    pub async fn delete_month(
        pool: &SqlitePool,
        employee_id: &str,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM calendar_events
            WHERE employee_id = ? AND start_date BETWEEN ? AND ?
            "#,
        )
        .bind(employee_id)
        .bind(first_day)
        .bind(last_day)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    /// Retention sweep: drop events (for all employees) whose range ended
    /// before the cutoff date. Returns the number of rows removed.
    pub async fn delete_ended_before(pool: &SqlitePool, cutoff: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE end_date < ?")
            .bind(cutoff)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}
