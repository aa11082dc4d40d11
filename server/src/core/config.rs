use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | WORK_DIR | ./data | database files, uploaded images, logs |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | TIMEZONE | Asia/Kolkata | business timezone for day boundaries |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | generated | HS256 signing key |
/// | JWT_EXPIRATION_MINUTES | 43200 | token lifetime (30 days) |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database, images and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Business timezone; all "today" boundaries are computed in it
    pub timezone: chrono_tz::Tz,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Running environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            timezone: std::env::var("TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::Asia::Kolkata),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
