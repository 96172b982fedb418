use std::env;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub calendar: CalendarConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin of the SPA, used for the CORS allow-list.
    pub frontend_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration_hours: i64,
    /// Optional bootstrap account created on first start when the
    /// employees table is empty. Read from `HR_ADMIN_EMAIL` / `HR_ADMIN_PASSWORD`.
    pub bootstrap_email: Option<String>,
    pub bootstrap_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Maximum events permitted to co-occur on one calendar day.
    pub day_event_cap: usize,
    /// Maximum events rendered inside one day cell; the rest are counted
    /// into the cell's overflow.
    pub visible_limit: usize,
    /// Character threshold above which displayed titles are truncated.
    pub title_limit: usize,
    /// Events whose range ended more than this many months ago are pruned
    /// by the retention worker.
    pub retention_months: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Allowed requests per second (per IP) for the login endpoint
    pub login_per_second: u32,
    /// Burst size for the login endpoint
    pub login_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
                frontend_url: env::var("FRONTEND_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://data/hr-portal.db".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .map_err(|_| ConfigError::MissingEnv("JWT_SECRET".to_string()))?,
                token_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                    .unwrap_or_else(|_| "12".to_string())
                    .parse()
                    .unwrap_or(12),
                bootstrap_email: env::var("HR_ADMIN_EMAIL").ok(),
                bootstrap_password: env::var("HR_ADMIN_PASSWORD").ok(),
            },
            calendar: CalendarConfig {
                day_event_cap: env::var("CALENDAR_DAY_EVENT_CAP")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .unwrap_or(3),
                visible_limit: env::var("CALENDAR_VISIBLE_LIMIT")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .unwrap_or(3),
                title_limit: env::var("CALENDAR_TITLE_LIMIT")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .unwrap_or(15),
                retention_months: env::var("CALENDAR_RETENTION_MONTHS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()
                    .unwrap_or(24),
            },
            rate_limit: RateLimitConfig {
                login_per_second: env::var("RATE_LIMIT_LOGIN_PER_SECOND")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .unwrap_or(3),
                login_burst: env::var("RATE_LIMIT_LOGIN_BURST")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                frontend_url: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://data/hr-portal.db".to_string(),
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_expiration_hours: 12,
                bootstrap_email: None,
                bootstrap_password: None,
            },
            calendar: CalendarConfig::default(),
            rate_limit: RateLimitConfig {
                login_per_second: 3,
                login_burst: 10,
            },
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            day_event_cap: 3,
            visible_limit: 3,
            title_limit: 15,
            retention_months: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_defaults() {
        let cfg = CalendarConfig::default();
        assert_eq!(cfg.day_event_cap, 3);
        assert_eq!(cfg.visible_limit, 3);
        assert_eq!(cfg.title_limit, 15);
        assert_eq!(cfg.retention_months, 24);
    }
}
