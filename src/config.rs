use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub concurrency_limit: usize,
    pub db_max_connections: u32,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_var("APP_PORT").unwrap_or(3000);
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_ttl_hours: parse_var("JWT_TTL_HOURS").unwrap_or(24),
            cors_origins,
            max_body_bytes: parse_var("MAX_BODY_BYTES").unwrap_or(1024 * 1024),
            concurrency_limit: parse_var("CONCURRENCY_LIMIT").unwrap_or(100),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(10),
            run_migrations: parse_var("RUN_MIGRATIONS").unwrap_or(true),
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}
