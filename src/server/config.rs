use chrono::Duration;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";
const DEFAULT_PAYMENT_EXPIRY_MINUTES: i64 = 30;

pub struct Config {
    pub database_url: String,
    pub bind_addr: String,

    /// HS256 secret used to validate bearer tokens.
    pub jwt_secret: String,

    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_api_url: String,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,

    /// How long a payment may stay pending before the expiry job cancels it.
    pub payment_expiry: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let payment_expiry_minutes = match std::env::var("PAYMENT_EXPIRY_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| ConfigError::InvalidEnvVar {
                    name: "PAYMENT_EXPIRY_MINUTES".to_string(),
                    value,
                })?,
            Err(_) => DEFAULT_PAYMENT_EXPIRY_MINUTES,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            jwt_secret: required("JWT_SECRET")?,
            razorpay_key_id: required("RAZORPAY_KEY_ID")?,
            razorpay_key_secret: required("RAZORPAY_KEY_SECRET")?,
            razorpay_api_url: optional("RAZORPAY_API_URL")
                .unwrap_or_else(|| DEFAULT_RAZORPAY_API_URL.to_string()),
            cors_origins: optional("CORS_ORIGINS")
                .map(|value| parse_origins(&value))
                .unwrap_or_default(),
            payment_expiry: Duration::minutes(payment_expiry_minutes),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Splits a comma separated origin list, dropping blanks and trailing slashes.
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
