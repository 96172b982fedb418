use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A monthly payroll statement. Rows are produced by the payroll pipeline
/// out of band; this service only reads them. Amounts are integer cents.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PayrollStatement {
    pub id: String,
    pub employee_id: String,
    pub period_year: i32,
    pub period_month: i32,
    pub gross_cents: i64,
    pub tax_cents: i64,
    pub deductions_cents: i64,
    pub net_cents: i64,
    pub issued_at: NaiveDateTime,
}
