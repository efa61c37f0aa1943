use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store = match &config.database_url {
            Some(url) => {
                let pool = db::connect(url, config.max_connections).await?;
                db::migrate(&pool).await;
                Arc::new(PgStore::new(pool)) as Arc<dyn Store>
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
                Arc::new(MemoryStore::new()) as Arc<dyn Store>
            }
        };
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::SwapiConfig;

        let config = Arc::new(AppConfig {
            database_url: None,
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            swapi: SwapiConfig {
                base_url: "http://swapi.invalid/api".into(),
                accept_invalid_certs: false,
                timeout_secs: 5,
            },
        });
        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
