use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SwapiConfig {
    pub base_url: String,
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
}

/// Optional user created by the seed binary so favorites work out of the box.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUserConfig {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SeedUserConfig {
    /// Read only by the seed binary.
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Option<Self>> {
        let Some(email) = var("SEED_USER_EMAIL").filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        let password = var("SEED_USER_PASSWORD")
            .context("SEED_USER_PASSWORD must be set when SEED_USER_EMAIL is")?;
        Ok(Some(Self {
            email,
            password,
            first_name: var("SEED_USER_FIRST_NAME").unwrap_or_else(|| "Luke".into()),
            last_name: var("SEED_USER_LAST_NAME").unwrap_or_else(|| "Skywalker".into()),
        }))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub swapi: SwapiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse::<u16>()?;

        let swapi = SwapiConfig {
            base_url: std::env::var("SWAPI_BASE_URL")
                .unwrap_or_else(|_| "https://swapi.dev/api".into()),
            accept_invalid_certs: std::env::var("SWAPI_ACCEPT_INVALID_CERTS")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            timeout_secs: std::env::var("SWAPI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            swapi,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
