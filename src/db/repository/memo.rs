use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{CreateDayMemo, DayMemo};
use crate::error::{AppError, AppResult};

/// Repository for per-day memos (`day_memos` table).
pub struct DayMemoRepository;

impl DayMemoRepository {
    pub async fn list_for_employee(
        pool: &SqlitePool,
        employee_id: &str,
    ) -> AppResult<Vec<DayMemo>> {
        let rows = sqlx::query_as::<_, DayMemo>(
            r#"
            SELECT id, employee_id, memo_date, body, created_at, updated_at
            FROM day_memos
            WHERE employee_id = ?
            ORDER BY memo_date, id
            "#,
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    pub async fn create(
        pool: &SqlitePool,
        employee_id: &str,
        create: &CreateDayMemo,
    ) -> AppResult<DayMemo> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, DayMemo>(
            r#"
            INSERT INTO day_memos (id, employee_id, memo_date, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, employee_id, memo_date, body, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(employee_id)
        .bind(create.memo_date)
        .bind(&create.body)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Delete one memo. Returns whether a row was removed.
    pub async fn delete(pool: &SqlitePool, employee_id: &str, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM day_memos WHERE id = ? AND employee_id = ?")
            .bind(id)
            .bind(employee_id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
