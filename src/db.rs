use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Applies the embedded `migrations/` directory.
pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}
