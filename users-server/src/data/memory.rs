//! In-process stand-ins for the Postgres adapters, used by handler and service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::data::store_probe::StoreProbe;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{User, UserDraft, UserId};

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<User>>,
    next_id: Mutex<UserId>,
    unavailable: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails the way a lost connection would.
    pub fn go_offline(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_online(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DomainError::Storage("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        self.check_online()?;
        let mut users = self.rows.lock().unwrap().clone();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        self.check_online()?;
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, draft: &UserDraft) -> Result<UserId, DomainError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == draft.email()) {
            return Err(DomainError::DuplicateEmail(draft.email().to_string()));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let now = Utc::now();
        rows.push(User {
            id: *next_id,
            name: draft.name().to_string(),
            email: draft.email().to_string(),
            created_at: now,
            updated_at: now,
        });
        Ok(*next_id)
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<u64, DomainError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.id != id && u.email == draft.email()) {
            return Err(DomainError::DuplicateEmail(draft.email().to_string()));
        }

        match rows.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.name = draft.name().to_string();
                user.email = draft.email().to_string();
                user.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: UserId) -> Result<u64, DomainError> {
        self.check_online()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok((before - rows.len()) as u64)
    }
}

pub struct FixedStoreProbe {
    reachable: bool,
    hangs: bool,
}

impl FixedStoreProbe {
    pub fn up() -> Self {
        Self {
            reachable: true,
            hangs: false,
        }
    }

    pub fn down() -> Self {
        Self {
            reachable: false,
            hangs: false,
        }
    }

    /// A store that accepts the ping and never answers.
    pub fn hanging() -> Self {
        Self {
            reachable: false,
            hangs: true,
        }
    }
}

#[async_trait]
impl StoreProbe for FixedStoreProbe {
    async fn ping(&self) -> Result<(), DomainError> {
        if self.hangs {
            std::future::pending::<()>().await;
        }
        if self.reachable {
            Ok(())
        } else {
            Err(DomainError::Storage("could not connect to server".into()))
        }
    }
}
