use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::error::DomainError;

/// Cheapest round trip that proves the store is reachable.
#[async_trait]
pub trait StoreProbe: Send + Sync {
    async fn ping(&self) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PostgresStoreProbe {
    pool: PgPool,
}

impl PostgresStoreProbe {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreProbe for PostgresStoreProbe {
    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(DomainError::storage)
    }
}
