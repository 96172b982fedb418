use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Serialize;

use crate::db::models::{Employee, UpdateEmployeeProfile};
use crate::db::EmployeeRepository;
use crate::error::{AppError, AppResult};
use crate::routes::auth::AuthUser;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(get_profile).put(update_profile))
}

/// Employee profile as exposed to the SPA. Never carries the password
/// hash.
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub department: String,
    pub job_title: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub hired_at: NaiveDate,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            email: e.email,
            display_name: e.display_name,
            department: e.department,
            job_title: e.job_title,
            phone: e.phone,
            avatar_url: e.avatar_url,
            hired_at: e.hired_at,
        }
    }
}

async fn get_profile(AuthUser(employee): AuthUser) -> Json<EmployeeResponse> {
    Json(employee.into())
}

/// Update the self-service profile fields (display name, phone, avatar).
async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(employee): AuthUser,
    Json(update): Json<UpdateEmployeeProfile>,
) -> AppResult<Json<EmployeeResponse>> {
    if let Some(ref name) = update.display_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "Display name must not be empty".to_string(),
            ));
        }
    }

    let updated = EmployeeRepository::update_profile(&state.db, &employee.id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    Ok(Json(updated.into()))
}
