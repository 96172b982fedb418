use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::models::Employee;
use crate::db::EmployeeRepository;
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

pub struct AuthService;

impl AuthService {
    /// Create a session JWT for an employee id.
    pub fn create_jwt(config: &Config, employee_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: employee_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(config.auth.token_expiration_hours)).timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    pub fn decode_jwt(config: &Config, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    /// Check a login password against the stored bcrypt hash.
    pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
        Ok(bcrypt::verify(password, password_hash)?)
    }

    pub fn hash_password(password: &str) -> AppResult<String> {
        Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
    }

    /// Resolve a bearer token to the employee it belongs to.
    pub async fn get_employee_from_token(
        state: &Arc<AppState>,
        token: &str,
    ) -> AppResult<Employee> {
        let claims = Self::decode_jwt(&state.config, token)?;

        EmployeeRepository::find_by_id(&state.db, &claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = "test-secret".to_string();
        config
    }

    #[test]
    fn jwt_roundtrip() {
        let config = test_config();
        let token = AuthService::create_jwt(&config, "emp-42").unwrap();
        let claims = AuthService::decode_jwt(&config, &token).unwrap();
        assert_eq!(claims.sub, "emp-42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn jwt_rejects_wrong_secret() {
        let config = test_config();
        let token = AuthService::create_jwt(&config, "emp-42").unwrap();

        let mut other = Config::default();
        other.auth.jwt_secret = "different-secret".to_string();
        assert!(AuthService::decode_jwt(&other, &token).is_err());
    }

    #[test]
    fn password_verify_matches_hash() {
        let hash = AuthService::hash_password("hunter2").unwrap();
        assert!(AuthService::verify_password("hunter2", &hash).unwrap());
        assert!(!AuthService::verify_password("hunter3", &hash).unwrap());
    }
}
