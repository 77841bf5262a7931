use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::config::{AppConfig, StoreBackend};
use crate::dashboard::{
    memory::MemoryFinanceRepo,
    repo::{FinanceRepo, PgFinanceRepo},
    samples::{self, SampleDataProvider},
};
use crate::settings::{
    memory::MemorySettingsRepo,
    repo::{PgSettingsRepo, SettingsRepo},
};
use crate::users::{
    memory::MemoryUserRepo,
    repo::{PgUserRepo, UserRepo},
};

/// Store handles and configuration shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub settings: Arc<dyn SettingsRepo>,
    pub finance: Arc<dyn FinanceRepo>,
    pub samples: Arc<dyn SampleDataProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        match &config.store {
            StoreBackend::Postgres { database_url } => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(10)
                    .connect(database_url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;

                Ok(Self::postgres(db, config.clone()))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config.clone()))
            }
        }
    }

    pub fn postgres(db: PgPool, config: Arc<AppConfig>) -> Self {
        let samples = samples::provider(&config.dashboard);
        Self {
            users: Arc::new(PgUserRepo::new(db.clone())),
            settings: Arc::new(PgSettingsRepo::new(db.clone())),
            finance: Arc::new(PgFinanceRepo::new(db)),
            samples,
            config,
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        let samples = samples::provider(&config.dashboard);
        Self {
            users: Arc::new(MemoryUserRepo::new()),
            settings: Arc::new(MemorySettingsRepo::new()),
            finance: Arc::new(MemoryFinanceRepo::new()),
            samples,
            config,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::in_memory(Arc::new(test_config()))
    }

    #[cfg(test)]
    pub fn fake_with(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = test_config();
        configure(&mut config);
        Self::in_memory(Arc::new(config))
    }
}

#[cfg(test)]
fn test_config() -> AppConfig {
    AppConfig {
        store: StoreBackend::Memory,
        jwt: crate::config::JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 60 * 24,
        },
        settings: Default::default(),
        dashboard: Default::default(),
    }
}
