use serde::Deserialize;

/// Session lifetime if SESSION_TTL_DAYS is not set.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub cookie_name: String,
    pub ttl_days: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub login_path: String,
    pub protected_prefixes: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "storefront-admin".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "storefront-admin-users".into()),
            cookie_name: std::env::var("SESSION_COOKIE").unwrap_or_else(|_| "session".into()),
            ttl_days: std::env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_DAYS),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };
        let login_path = std::env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".into());
        let protected_prefixes = std::env::var("PROTECTED_PATHS")
            .unwrap_or_else(|_| "/dashboard".into())
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Ok(Self {
            database_url,
            session,
            login_path,
            protected_prefixes,
        })
    }
}
