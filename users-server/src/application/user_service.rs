use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{User, UserDraft, UserId};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, draft: UserDraft) -> Result<User, DomainError> {
        let id = self.repo.insert(&draft).await?;
        self.reread(id).await
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: UserId, draft: UserDraft) -> Result<User, DomainError> {
        if self.repo.update(id, &draft).await? == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        self.reread(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), DomainError> {
        match self.repo.delete_by_id(id).await? {
            0 => Err(DomainError::UserNotFound(id)),
            _ => Ok(()),
        }
    }

    // A row written a moment ago that cannot be read back is a store fault, not a 404.
    async fn reread(&self, id: UserId) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Storage(format!("user {id} missing after write")))
    }
}
