use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::{Employee, UpdateEmployeeProfile};
use crate::error::{AppError, AppResult};

/// Repository for employee accounts and profiles (`employees` table).
pub struct EmployeeRepository;

impl EmployeeRepository {
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, email, password_hash, display_name, department, job_title,
                   phone, avatar_url, hired_at, created_at, updated_at
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, email, password_hash, display_name, department, job_title,
                   phone, avatar_url, hired_at, created_at, updated_at
            FROM employees
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(pool)
            .await
            .map_err(AppError::Database)?;

        Ok(count)
    }

    /// Insert a new employee account. Used by the bootstrap seeding path;
    /// regular accounts arrive through the HR master data import.
    pub async fn create(
        pool: &SqlitePool,
        email: &str,
        password_hash: &str,
        display_name: &str,
        department: &str,
        job_title: &str,
        hired_at: NaiveDate,
    ) -> AppResult<Employee> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (
                id, email, password_hash, display_name, department, job_title,
                phone, avatar_url, hired_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, email, password_hash, display_name, department, job_title,
                      phone, avatar_url, hired_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .bind(department)
        .bind(job_title)
        .bind::<Option<String>>(None)
        .bind::<Option<String>>(None)
        .bind(hired_at)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }

    /// Update the self-service profile fields. Absent fields keep their
    /// stored value. Returns `None` when the employee no longer exists.
    pub async fn update_profile(
        pool: &SqlitePool,
        id: &str,
        update: UpdateEmployeeProfile,
    ) -> AppResult<Option<Employee>> {
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, Employee>(
            r#"
            UPDATE employees
            SET display_name = COALESCE(?, display_name),
                phone = COALESCE(?, phone),
                avatar_url = COALESCE(?, avatar_url),
                updated_at = ?
            WHERE id = ?
            RETURNING id, email, password_hash, display_name, department, job_title,
                      phone, avatar_url, hired_at, created_at, updated_at
            "#,
        )
        .bind(update.display_name)
        .bind(update.phone)
        .bind(update.avatar_url)
        .bind(now)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }
}
