use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::models::PayrollStatement;
use crate::db::PayrollRepository;
use crate::error::{AppError, AppResult};
use crate::routes::auth::AuthUser;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_statements))
        .route("/:id", get(get_statement))
}

#[derive(Debug, Serialize)]
pub struct PayrollStatementResponse {
    pub id: String,
    /// Statement period as `YYYY-MM`.
    pub period: String,
    pub gross_cents: i64,
    pub tax_cents: i64,
    pub deductions_cents: i64,
    pub net_cents: i64,
    pub issued_at: NaiveDateTime,
}

impl From<PayrollStatement> for PayrollStatementResponse {
    fn from(s: PayrollStatement) -> Self {
        Self {
            id: s.id,
            period: format!("{:04}-{:02}", s.period_year, s.period_month),
            gross_cents: s.gross_cents,
            tax_cents: s.tax_cents,
            deductions_cents: s.deductions_cents,
            net_cents: s.net_cents,
            issued_at: s.issued_at,
        }
    }
}

/// All of the employee's payroll statements, newest period first.
async fn list_statements(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
) -> AppResult<Json<Vec<PayrollStatementResponse>>> {
    let statements = PayrollRepository::list_for_employee(&state.db, &employee.id).await?;
    Ok(Json(statements.into_iter().map(Into::into).collect()))
}

async fn get_statement(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<PayrollStatementResponse>> {
    let statement = PayrollRepository::find_by_id(&state.db, &employee.id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Statement {} not found", id)))?;

    Ok(Json(statement.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_label_is_zero_padded() {
        let ts = NaiveDateTime::parse_from_str("2025-07-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let statement = PayrollStatement {
            id: "p1".to_string(),
            employee_id: "emp-1".to_string(),
            period_year: 2025,
            period_month: 6,
            gross_cents: 520_000,
            tax_cents: 110_000,
            deductions_cents: 30_000,
            net_cents: 380_000,
            issued_at: ts,
        };

        let response = PayrollStatementResponse::from(statement);
        assert_eq!(response.period, "2025-06");
        assert_eq!(response.net_cents, 380_000);
    }
}
