use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Base64-encoded HMAC signing secret.
    pub secret: String,
    /// Token lifetime in milliseconds.
    pub expiration_ms: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            expiration_ms: std::env::var("JWT_EXPIRATION_MS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(86_400_000),
        };
        Ok(Self { database_url, jwt })
    }
}
