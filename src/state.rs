use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::memory::MemoryStore;
use crate::movies::repo::{CatalogRepo, PgCatalogRepo};
use crate::users::repo::{AccountRepo, PgAccountRepo};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<dyn AccountRepo>,
    pub catalog: Arc<dyn CatalogRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        match config.store {
            StoreBackend::Postgres => {
                let pool = db::connect(&config).await?;
                db::migrate(&pool).await?;
                Ok(Self::from_parts(
                    config,
                    Arc::new(PgAccountRepo::new(pool.clone())),
                    Arc::new(PgCatalogRepo::new(pool)),
                ))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        accounts: Arc<dyn AccountRepo>,
        catalog: Arc<dyn CatalogRepo>,
    ) -> Self {
        Self {
            config,
            accounts,
            catalog,
        }
    }

    /// Both repositories backed by one `MemoryStore`, so account deletion cascades.
    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        let store = MemoryStore::new();
        Self::from_parts(config, Arc::new(store.clone()), Arc::new(store))
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            store: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
        });
        Self::in_memory(config)
    }
}
