use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::error::DomainError;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name and email as submitted by a client, checked for presence.
///
/// Email format is not inspected; uniqueness is left to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: String,
    email: String,
}

impl UserDraft {
    pub const MISSING_FIELDS: &'static str = "Name and email are required";

    pub fn new(name: Option<String>, email: Option<String>) -> Result<Self, DomainError> {
        match (name, email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Ok(Self { name, email })
            }
            _ => Err(DomainError::Validation(Self::MISSING_FIELDS.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
