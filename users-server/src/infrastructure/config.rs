use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

/// Development exposes raw error text in 500 responses; production hides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            RuntimeMode::Production
        } else {
            RuntimeMode::Development
        }
    }

    pub fn exposes_details(self) -> bool {
        self != RuntimeMode::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeMode::Development => "development",
            RuntimeMode::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Options for the server itself, without selecting a database.
    pub fn server_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        self.server_options().database(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub frontend_url: String,
    pub mode: RuntimeMode,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "5000")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let db_port = var("DB_PORT", "5432")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid DB_PORT: {}", e))?;
        let max_connections = var("DB_POOL_SIZE", "10")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid DB_POOL_SIZE: {}", e))?;
        if max_connections == 0 {
            anyhow::bail!("DB_POOL_SIZE must be at least 1");
        }
        let name = lookup("DB_NAME")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("DB_NAME must be set"))?;

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            database: DatabaseConfig {
                host: var("DB_HOST", "localhost"),
                port: db_port,
                user: var("DB_USER", "postgres"),
                password: var("DB_PASSWORD", ""),
                name,
                max_connections,
            },
            frontend_url: var("FRONTEND_URL", "http://localhost:5173"),
            mode: RuntimeMode::parse(&var("APP_ENV", "development")),
        })
    }
}
