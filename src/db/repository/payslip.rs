use sqlx::SqlitePool;

use crate::db::models::PayrollStatement;
use crate::error::{AppError, AppResult};

/// Read-only repository for payroll statements (`payroll_statements`
/// table). Rows are written by the payroll pipeline, never by this
/// service.
pub struct PayrollRepository;

impl PayrollRepository {
    /// All statements for one employee, newest period first.
    pub async fn list_for_employee(
        pool: &SqlitePool,
        employee_id: &str,
    ) -> AppResult<Vec<PayrollStatement>> {
        let rows = sqlx::query_as::<_, PayrollStatement>(
            r#"
            SELECT id, employee_id, period_year, period_month,
                   gross_cents, tax_cents, deductions_cents, net_cents, issued_at
            FROM payroll_statements
            WHERE employee_id = ?
            ORDER BY period_year DESC, period_month DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(rows)
    }

    /// One statement by id, scoped to the owning employee.
    pub async fn find_by_id(
        pool: &SqlitePool,
        employee_id: &str,
        id: &str,
    ) -> AppResult<Option<PayrollStatement>> {
        let row = sqlx::query_as::<_, PayrollStatement>(
            r#"
            SELECT id, employee_id, period_year, period_month,
                   gross_cents, tax_cents, deductions_cents, net_cents, issued_at
            FROM payroll_statements
            WHERE id = ? AND employee_id = ?
            "#,
        )
        .bind(id)
        .bind(employee_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?;

        Ok(row)
    }
}
