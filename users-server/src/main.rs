use anyhow::Context;
use tracing::info;
use users_server::infrastructure::config::AppConfig;
use users_server::infrastructure::database;
use users_server::infrastructure::logging::init_logging;
use users_server::server::{self, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(
        db_host = %config.database.host,
        db_port = config.database.port,
        db_user = %config.database.user,
        db_name = %config.database.name,
        "initializing database"
    );

    let pool = database::initialize(&config.database)
        .await
        .context("database initialization failed")?;

    let state = AppState::from_pool(pool, &config);
    server::run(&config, state).await
}
