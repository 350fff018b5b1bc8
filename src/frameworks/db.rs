use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

// Open the user store pool and bring the schema up to date.
pub async fn connect_user_store(database_url: &str) -> Result<PgPool, StoreSetupError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("user store migrations applied");

    Ok(pool)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreSetupError {
    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
