use crate::domain::error::DomainError;
use crate::domain::user::{User, UserDraft, UserId};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, newest first.
    async fn list_all(&self) -> Result<Vec<User>, DomainError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;
    /// Returns the id assigned by the store.
    async fn insert(&self, draft: &UserDraft) -> Result<UserId, DomainError>;
    /// Returns the number of rows touched; zero means the id does not exist.
    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<u64, DomainError>;
    async fn delete_by_id(&self, id: UserId) -> Result<u64, DomainError>;
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps the store's unique-constraint signal to [`DomainError::DuplicateEmail`].
fn write_error(err: sqlx::Error, email: &str) -> DomainError {
    let duplicate = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);

    if duplicate {
        DomainError::DuplicateEmail(email.to_string())
    } else {
        DomainError::storage(err)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching users: {}", e);
            DomainError::storage(e)
        })
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find user by id {}: {}", id, e);
            DomainError::storage(e)
        })
    }

    async fn insert(&self, draft: &UserDraft) -> Result<UserId, DomainError> {
        let id: UserId = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(draft.name())
        .bind(draft.email())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create user: {}", e);
            write_error(e, draft.email())
        })?;

        info!(user_id = id, email = %draft.email(), "user created");
        Ok(id)
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<u64, DomainError> {
        let result = sqlx::query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
            .bind(draft.name())
            .bind(draft.email())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to update user {}: {}", id, e);
                write_error(e, draft.email())
            })?;

        if result.rows_affected() > 0 {
            info!(user_id = id, "user updated");
        }

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete user {}: {}", id, e);
                DomainError::storage(e)
            })?;

        if result.rows_affected() > 0 {
            info!(user_id = id, "user deleted");
        }

        Ok(result.rows_affected())
    }
}
