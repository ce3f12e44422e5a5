use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use tracing::info;

use crate::infrastructure::config::DatabaseConfig;

const MAINTENANCE_DATABASE: &str = "postgres";

/// Creates the target database when the server does not have it yet.
pub async fn ensure_database(config: &DatabaseConfig) -> Result<(), sqlx::Error> {
    let mut conn =
        PgConnection::connect_with(&config.server_options().database(MAINTENANCE_DATABASE))
            .await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&config.name)
            .fetch_one(&mut conn)
            .await?;

    if !exists {
        info!(database = %config.name, "creating database");
        let statement = format!("CREATE DATABASE {}", quote_identifier(&config.name));
        conn.execute(statement.as_str()).await?;
    }

    conn.close().await
}

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options())
        .await?;
    info!(
        database = %config.name,
        max_connections = config.max_connections,
        "connected to PostgreSQL"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("running database migrations");
    sqlx::migrate!().run(pool).await?;
    info!("migrations completed");
    Ok(())
}

/// Database, pool and `users` table, in that order. Nothing may listen before this returns.
pub async fn initialize(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    ensure_database(config).await?;
    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    info!("database initialized");
    Ok(pool)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
