//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_STORAGE_BUCKET, MIN_JWT_SECRET_LENGTH, TOKEN_EXPIRATION_DAYS,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub token_expiration_days: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Base URL of the blob storage service (Supabase-compatible)
    pub storage_url: String,
    storage_key: String,
    pub storage_bucket: String,
    /// Mailgun-style notification credentials; notifications are logged
    /// instead of sent when unset.
    pub mailgun_api_key: Option<String>,
    pub mailgun_domain: String,
    pub mail_sender: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_expiration_days", &self.token_expiration_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("storage_url", &self.storage_url)
            .field("storage_key", &"[REDACTED]")
            .field("storage_bucket", &self.storage_bucket)
            .field("mailgun_api_key", &"[REDACTED]")
            .field("mailgun_domain", &self.mailgun_domain)
            .field("mail_sender", &self.mail_sender)
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
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                // Production mode: panic
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        // Validate JWT secret length
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            token_expiration_days: env::var("TOKEN_EXPIRATION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(TOKEN_EXPIRATION_DAYS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            storage_url: env::var("STORAGE_URL").unwrap_or_default(),
            storage_key: env::var("STORAGE_KEY").unwrap_or_default(),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| DEFAULT_STORAGE_BUCKET.to_string()),
            mailgun_api_key: env::var("MAILGUN_API_KEY").ok(),
            mailgun_domain: env::var("MAILGUN_DOMAIN").unwrap_or_default(),
            mail_sender: env::var("MAIL_SENDER")
                .unwrap_or_else(|_| "Service Desk <no-reply@localhost>".to_string()),
        }
    }

    /// Fixed configuration for unit tests, no environment involved.
    #[cfg(test)]
    pub(crate) fn test_default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: "test-secret-key-minimum-32-chars!".to_string(),
            token_expiration_days: TOKEN_EXPIRATION_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            storage_url: "http://storage.test".to_string(),
            storage_key: "test-storage-key".to_string(),
            storage_bucket: DEFAULT_STORAGE_BUCKET.to_string(),
            mailgun_api_key: None,
            mailgun_domain: String::new(),
            mail_sender: "Service Desk <no-reply@localhost>".to_string(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the blob storage API key.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
