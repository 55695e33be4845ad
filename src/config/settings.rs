//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_LOCKOUT_MAX_FAILED_ATTEMPTS,
    DEFAULT_LOCKOUT_MINUTES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub lockout_max_failed_attempts: i32,
    pub lockout_minutes: i64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("db_max_connections", &self.db_max_connections)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("lockout_max_failed_attempts", &self.lockout_max_failed_attempts)
            .field("lockout_minutes", &self.lockout_minutes)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            db_max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            jwt_secret,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            lockout_max_failed_attempts: parse_var("LOCKOUT_MAX_FAILED_ATTEMPTS")
                .unwrap_or(DEFAULT_LOCKOUT_MAX_FAILED_ATTEMPTS),
            lockout_minutes: parse_var("LOCKOUT_MINUTES").unwrap_or(DEFAULT_LOCKOUT_MINUTES),
        }
    }

    /// Build a configuration directly, with defaults for everything except
    /// the database URL and signing secret.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            lockout_max_failed_attempts: DEFAULT_LOCKOUT_MAX_FAILED_ATTEMPTS,
            lockout_minutes: DEFAULT_LOCKOUT_MINUTES,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Bind address, with optional command-line overrides.
    pub fn server_addr(&self, host: Option<&str>, port: Option<u16>) -> String {
        format!(
            "{}:{}",
            host.unwrap_or(&self.server_host),
            port.unwrap_or(self.server_port)
        )
    }

    /// Whether the database lives in process memory; such a database is
    /// per connection, so the pool must hold exactly one.
    pub fn is_in_memory_database(&self) -> bool {
        self.database_url.starts_with("sqlite::memory:") || self.database_url.contains("mode=memory")
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr_overrides() {
        let config = Config::new("sqlite::memory:", "x".repeat(32));
        assert_eq!(config.server_addr(None, None), "0.0.0.0:3000");
        assert_eq!(config.server_addr(Some("127.0.0.1"), Some(8080)), "127.0.0.1:8080");
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(Config::new("sqlite::memory:", "s").is_in_memory_database());
        assert!(Config::new("sqlite://school?mode=memory", "s").is_in_memory_database());
        assert!(!Config::new("sqlite://school.db?mode=rwc", "s").is_in_memory_database());
        assert!(!Config::new(DEFAULT_DATABASE_URL, "s").is_in_memory_database());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://admin:hunter2@db/school", "super-secret-signing-key-32-chars");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("super-secret"));
    }
}
