use crate::domain::auth::TokenManager;
use anyhow::Result;
use std::env;

/// Runtime configuration, sourced from the environment (with `.env` support
/// for development).
#[derive(Debug, Clone)]
pub struct Config {
    /// `development` or `production`.
    pub environment: String,
    pub port: u16,
    /// Directory holding the JSON snapshot files.
    pub data_dir: String,
    /// HS256 secret for the `jwt` session cookie.
    pub jwt_secret: String,
    /// Session token lifetime.
    pub token_ttl_hours: i64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid PORT: {e}"))?;

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        // A missing secret is tolerated in development (a fresh one is
        // generated per process) but rejected by validate() in production.
        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| TokenManager::generate_secret());

        let token_ttl_hours = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("Invalid TOKEN_TTL_HOURS: {e}"))?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            port,
            data_dir,
            jwt_secret,
            token_ttl_hours,
            log_level,
        })
    }

    /// Collect configuration problems; an empty list means the config is
    /// usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.environment != "development" && self.environment != "production" {
            errors.push(format!("Unknown environment: {}", self.environment));
        }
        if self.environment == "production" && env::var("JWT_SECRET").is_err() {
            errors.push("JWT_SECRET must be set explicitly in production".to_string());
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters".to_string());
        }
        if self.token_ttl_hours <= 0 {
            errors.push("TOKEN_TTL_HOURS must be positive".to_string());
        }
        if self.data_dir.trim().is_empty() {
            errors.push("DATA_DIR must not be empty".to_string());
        }

        errors
    }

    pub fn token_manager(&self) -> TokenManager {
        TokenManager::new(self.jwt_secret.clone(), self.token_ttl_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            environment: "development".to_string(),
            port: 4000,
            data_dir: "data".to_string(),
            jwt_secret: TokenManager::generate_secret(),
            token_ttl_hours: 24,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        assert!(base_config().validate().is_empty());
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = Config {
            jwt_secret: "short".to_string(),
            ..base_config()
        };
        assert!(!config.validate().is_empty());
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let config = Config {
            environment: "staging".to_string(),
            ..base_config()
        };
        assert!(!config.validate().is_empty());
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let config = Config {
            token_ttl_hours: 0,
            ..base_config()
        };
        assert!(!config.validate().is_empty());
    }
}
