use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub department: String,
    pub job_title: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub hired_at: NaiveDate,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Mutable profile fields an employee may edit themselves. Everything else
/// (department, title, hire date) is owned by the HR master data feed.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEmployeeProfile {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}
