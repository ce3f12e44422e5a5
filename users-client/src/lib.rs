//! Typed client for the user directory API and the state controller that front-ends
//! build on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod directory;
mod error;
mod http_client;

pub use directory::{NOTICE_TTL, Notice, NoticeKind, UserDirectory, UserForm};
pub use error::UserClientError;
pub use http_client::UserClientHttp;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

/// `{success, message?, data?, error?}` as returned by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Outcome of a health endpoint. A 503 is a valid answer here, not an error.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub healthy: bool,
    pub http_status: u16,
    pub message: Option<String>,
    pub details: serde_json::Value,
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, UserClientError>;
    async fn get_user(&self, id: UserId) -> Result<User, UserClientError>;
    async fn create_user(&self, input: &UserInput) -> Result<User, UserClientError>;
    async fn update_user(&self, id: UserId, input: &UserInput) -> Result<User, UserClientError>;
    async fn delete_user(&self, id: UserId) -> Result<(), UserClientError>;
    /// Full report: uptime, memory and database latency.
    async fn health(&self) -> Result<HealthCheck, UserClientError>;
    async fn liveness(&self) -> Result<HealthCheck, UserClientError>;
    async fn readiness(&self) -> Result<HealthCheck, UserClientError>;
}
