//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use domain::HashCost;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_MAIL_FROM, DEFAULT_REDIS_URL,
    DEFAULT_REVOCATION_PRUNE_INTERVAL_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Secret used in debug builds when `JWT_SECRET` is missing.
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Adds the `Secure` attribute to the session cookie
    pub cookie_secure: bool,
    pub hash_cost: HashCost,
    pub revocation_prune_interval_secs: u64,
    pub mail_from: String,
    pub smtp_host: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cookie_secure", &self.cookie_secure)
            .field("hash_cost", &self.hash_cost)
            .field(
                "revocation_prune_interval_secs",
                &self.revocation_prune_interval_secs,
            )
            .field("mail_from", &self.mail_from)
            .field("smtp_host", &self.smtp_host)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    /// Returns `AppError::Config` when no usable signing secret is available
    /// (`JWT_SECRET` unset in a release build, or shorter than the minimum length)
    /// or when `JWT_EXPIRATION_HOURS` is outside `1..=MAX_JWT_EXPIRATION_HOURS`.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::config(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            memory_kib: env_parse("HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: env_parse("HASH_ITERATIONS", defaults.iterations),
            parallelism: env_parse("HASH_PARALLELISM", defaults.parallelism),
        };

        let mut config = Self::with_secret(jwt_secret)?;
        config.database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        config.redis_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        config.jwt_expiration_hours =
            env_parse("JWT_EXPIRATION_HOURS", DEFAULT_JWT_EXPIRATION_HOURS);
        config.server_host =
            env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        config.server_port = env_parse("SERVER_PORT", DEFAULT_SERVER_PORT);
        config.cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        config.hash_cost = hash_cost;
        config.revocation_prune_interval_secs = env_parse(
            "REVOCATION_PRUNE_INTERVAL_SECS",
            DEFAULT_REVOCATION_PRUNE_INTERVAL_SECS,
        );
        config.mail_from = env::var("SMTP_FROM").unwrap_or_else(|_| DEFAULT_MAIL_FROM.to_string());
        config.smtp_host = env::var("SMTP_HOST").ok();

        config.session_ttl()?;
        Ok(config)
    }

    /// Build a configuration with defaults around an explicit signing secret.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the secret is shorter than the minimum length.
    pub fn with_secret(jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cookie_secure: false,
            hash_cost: HashCost::default(),
            revocation_prune_interval_secs: DEFAULT_REVOCATION_PRUNE_INTERVAL_SECS,
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            smtp_host: None,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Session lifetime as a chrono duration.
    ///
    /// # Errors
    /// Returns `AppError::Config` unless `jwt_expiration_hours` is within
    /// `1..=MAX_JWT_EXPIRATION_HOURS`.
    pub fn session_ttl(&self) -> AppResult<chrono::Duration> {
        let hours = self.jwt_expiration_hours;
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&hours) {
            return Err(AppError::config(format!(
                "JWT_EXPIRATION_HOURS must be between 1 and {}, got {}",
                MAX_JWT_EXPIRATION_HOURS, hours
            )));
        }

        chrono::Duration::try_hours(hours)
            .ok_or_else(|| AppError::config("JWT_EXPIRATION_HOURS is out of range"))
    }
}

/// Parse an environment variable, falling back to `default` when unset or malformed.
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
