use crate::utils::AppError;
use std::env;

const DEFAULT_DATABASE_NAME: &str = "employeeDB";

/// Runtime configuration, read once at startup from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub access_token_secret: String,
    pub stripe_secret_key: String,
    /// Empty means any origin is accepted.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests do not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("PORT must be a valid port number: {}", e)))?;

        let database_url = match lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            Some(url) => url,
            None => {
                let user = require("DB_USER")
                    .map_err(|_| AppError::Config("DATABASE_URL or DB_USER/DB_PASS/DB_CLUSTER must be set".into()))?;
                let pass = require("DB_PASS")?;
                let cluster = require("DB_CLUSTER")?;
                format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                    user, pass, cluster
                )
            }
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            access_token_secret: require("ACCESS_TOKEN_SECRET")?,
            stripe_secret_key: require("STRIPE_SECRET_KEY")?,
            cors_origins,
        })
    }
}
