use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::EmployeeRepository;
use crate::error::{AppError, AppResult};
use crate::routes::employees::EmployeeResponse;
use crate::services::auth::AuthService;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub employee: EmployeeResponse,
}

/// Email + password login. Issues a bearer JWT on success. The response
/// is identical for unknown accounts and wrong passwords.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let employee = EmployeeRepository::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !AuthService::verify_password(&request.password, &employee.password_hash)? {
        tracing::debug!("Failed login attempt for {}", email);
        return Err(AppError::Unauthorized);
    }

    let token = AuthService::create_jwt(&state.config, &employee.id)?;

    Ok(Json(LoginResponse {
        token,
        employee: employee.into(),
    }))
}

async fn me(AuthUser(employee): AuthUser) -> Json<EmployeeResponse> {
    Json(employee.into())
}

/// Sessions are stateless bearer tokens; logout is acknowledged so the
/// SPA has a uniform call site, the token is discarded client-side.
async fn logout(AuthUser(_employee): AuthUser) -> Json<serde_json::Value> {
    Json(json!({ "message": "Logged out" }))
}

// ============================================================================
// Auth Middleware / Extractor
// ============================================================================

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Extractor for the authenticated employee.
pub struct AuthUser(pub crate::db::Employee);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Extract Authorization header (Bearer token)
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                tracing::debug!("Missing or invalid Authorization header");
                AppError::Unauthorized
            })?;

        if !auth_header.to_ascii_lowercase().starts_with("bearer ") {
            tracing::debug!("Authorization header doesn't start with 'Bearer '");
            return Err(AppError::Unauthorized);
        }

        let token = auth_header[7..].trim();
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        let employee = AuthService::get_employee_from_token(state, token).await?;

        Ok(AuthUser(employee))
    }
}
