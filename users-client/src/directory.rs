//! Front-end state for the user directory: the fetched list, the add/edit form and
//! short-lived notices. Every successful mutation is followed by a full re-fetch; the
//! local list is never patched in place.
//!
//! Success and error notices live in separate slots, so a failed re-fetch right after a
//! save shows both. They disappear together once [`NOTICE_TTL`] has passed since the
//! latest one was posted.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::{User, UserApi, UserClientError, UserId, UserInput};

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    posted_at: Instant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
}

pub struct UserDirectory<A> {
    api: A,
    users: Vec<User>,
    loading: bool,
    submitting: bool,
    mounted: bool,
    success: Option<Notice>,
    error: Option<Notice>,
    form: UserForm,
    editing: Option<UserId>,
    pending_delete: Option<UserId>,
}

impl<A: UserApi> UserDirectory<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            users: Vec::new(),
            loading: true,
            submitting: false,
            mounted: false,
            success: None,
            error: None,
            form: UserForm::default(),
            editing: None,
            pending_delete: None,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn editing(&self) -> Option<UserId> {
        self.editing
    }

    pub fn pending_delete(&self) -> Option<UserId> {
        self.pending_delete
    }

    pub fn success_notice(&self) -> Option<&Notice> {
        self.success.as_ref().filter(|_| !self.notices_expired())
    }

    pub fn error_notice(&self) -> Option<&Notice> {
        self.error.as_ref().filter(|_| !self.notices_expired())
    }

    /// Visible notices, success first.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.success_notice().into_iter().chain(self.error_notice())
    }

    /// Drops expired notices. Returns true when something was cleared.
    pub fn expire_notices(&mut self) -> bool {
        if self.notices_expired() {
            self.success = None;
            self.error = None;
            true
        } else {
            false
        }
    }

    fn notices_expired(&self) -> bool {
        [&self.success, &self.error]
            .into_iter()
            .flatten()
            .map(|n| n.posted_at)
            .max()
            .is_some_and(|latest| latest.elapsed() >= NOTICE_TTL)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.form.email = email.into();
    }

    /// First fetch; later calls do nothing.
    pub async fn mount(&mut self) {
        if !self.mounted {
            self.mounted = true;
            self.refresh().await;
        }
    }

    pub async fn refresh(&mut self) {
        self.loading = true;
        match self.api.list_users().await {
            Ok(users) => self.users = users,
            Err(err) => self.post_failure(&err, "Failed to connect to server"),
        }
        self.loading = false;
    }

    /// Creates when no row is being edited, updates otherwise. Returns whether the
    /// server accepted the change.
    pub async fn submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.clear_error();

        let input = UserInput {
            name: self.form.name.clone(),
            email: self.form.email.clone(),
        };
        let outcome = match self.editing {
            Some(id) => self.api.update_user(id, &input).await.map(|_| "User updated successfully!"),
            None => self.api.create_user(&input).await.map(|_| "User created successfully!"),
        };

        let accepted = match outcome {
            Ok(message) => {
                self.post(NoticeKind::Success, message);
                self.form = UserForm::default();
                self.editing = None;
                self.refresh().await;
                true
            }
            Err(err) => {
                self.post_failure(&err, "Failed to save user");
                false
            }
        };
        self.submitting = false;
        accepted
    }

    pub fn edit(&mut self, user: &User) {
        self.form = UserForm {
            name: user.name.clone(),
            email: user.email.clone(),
        };
        self.editing = Some(user.id);
        self.success = None;
        self.error = None;
    }

    /// Leaves edit mode without contacting the server.
    pub fn cancel_edit(&mut self) {
        self.form = UserForm::default();
        self.editing = None;
        self.clear_error();
    }

    /// First step of a delete; nothing is sent until [`Self::confirm_delete`].
    pub fn request_delete(&mut self, id: UserId) {
        self.pending_delete = Some(id);
    }

    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };

        match self.api.delete_user(id).await {
            Ok(()) => {
                self.post(NoticeKind::Success, "User deleted successfully!");
                self.refresh().await;
                true
            }
            Err(err) => {
                self.post_failure(&err, "Failed to delete user");
                false
            }
        }
    }

    fn post(&mut self, kind: NoticeKind, text: impl Into<String>) {
        let notice = Some(Notice {
            kind,
            text: text.into(),
            posted_at: Instant::now(),
        });
        match kind {
            NoticeKind::Success => self.success = notice,
            NoticeKind::Error => self.error = notice,
        }
    }

    fn post_failure(&mut self, err: &UserClientError, fallback: &str) {
        debug!(error = %err, "directory request failed");
        let text = err.server_message().unwrap_or(fallback).to_string();
        self.post(NoticeKind::Error, text);
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HealthCheck;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        users: Mutex<Vec<User>>,
        calls: Mutex<Vec<String>>,
        offline: bool,
        fail_listing: bool,
    }

    impl FakeApi {
        fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn record(&self, call: impl Into<String>) -> Result<(), UserClientError> {
            self.calls.lock().unwrap().push(call.into());
            if self.offline {
                Err(UserClientError::InvalidResponse("connection refused".into()))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn rejected(status: u16, message: &str) -> UserClientError {
            UserClientError::Api {
                status,
                message: message.into(),
            }
        }
    }

    #[async_trait]
    impl UserApi for FakeApi {
        async fn list_users(&self) -> Result<Vec<User>, UserClientError> {
            self.record("list")?;
            if self.fail_listing {
                return Err(UserClientError::InvalidResponse("connection reset".into()));
            }
            let mut users = self.users.lock().unwrap().clone();
            users.reverse();
            Ok(users)
        }

        async fn get_user(&self, id: UserId) -> Result<User, UserClientError> {
            self.record(format!("get {id}"))?;
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or_else(|| Self::rejected(404, "User not found"))
        }

        async fn create_user(&self, input: &UserInput) -> Result<User, UserClientError> {
            self.record("create")?;
            let mut users = self.users.lock().unwrap();
            if input.name.is_empty() || input.email.is_empty() {
                return Err(Self::rejected(400, "Name and email are required"));
            }
            if users.iter().any(|u| u.email == input.email) {
                return Err(Self::rejected(400, "Email already exists"));
            }
            let user = User {
                id: users.len() as UserId + 1,
                name: input.name.clone(),
                email: input.email.clone(),
                created_at: None,
                updated_at: None,
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn update_user(&self, id: UserId, input: &UserInput) -> Result<User, UserClientError> {
            self.record(format!("update {id}"))?;
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| Self::rejected(404, "User not found"))?;
            user.name = input.name.clone();
            user.email = input.email.clone();
            Ok(user.clone())
        }

        async fn delete_user(&self, id: UserId) -> Result<(), UserClientError> {
            self.record(format!("delete {id}"))?;
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| u.id != id);
            if users.len() == before {
                Err(Self::rejected(404, "User not found"))
            } else {
                Ok(())
            }
        }

        async fn health(&self) -> Result<HealthCheck, UserClientError> {
            unreachable!("the directory never probes health")
        }

        async fn liveness(&self) -> Result<HealthCheck, UserClientError> {
            unreachable!("the directory never probes health")
        }

        async fn readiness(&self) -> Result<HealthCheck, UserClientError> {
            unreachable!("the directory never probes health")
        }
    }

    async fn directory_with(names: &[(&str, &str)]) -> UserDirectory<FakeApi> {
        let mut directory = UserDirectory::new(FakeApi::default());
        for (name, email) in names {
            directory.set_name(*name);
            directory.set_email(*email);
            assert!(directory.submit().await);
        }
        directory
    }

    #[tokio::test]
    async fn mount_fetches_exactly_once() {
        let mut directory = UserDirectory::new(FakeApi::default());
        assert!(directory.is_loading());

        directory.mount().await;
        directory.mount().await;

        assert!(!directory.is_loading());
        assert_eq!(directory.api.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn create_refetches_and_clears_form() {
        let mut directory = UserDirectory::new(FakeApi::default());
        directory.set_name("Ada");
        directory.set_email("ada@x.com");

        assert!(directory.submit().await);

        assert_eq!(directory.api.calls(), vec!["create", "list"]);
        assert_eq!(directory.users().len(), 1);
        assert_eq!(directory.form(), &UserForm::default());
        let notice = directory.success_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.text, "User created successfully!");
        assert!(directory.error_notice().is_none());
    }

    #[tokio::test]
    async fn rejected_submit_shows_server_message_and_keeps_list() {
        let mut directory = directory_with(&[("Ada", "ada@x.com")]).await;
        let before = directory.users().to_vec();
        let calls_before = directory.api.calls().len();

        directory.set_name("Eve");
        directory.set_email("ada@x.com");
        assert!(!directory.submit().await);

        let notice = directory.error_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Email already exists");
        assert_eq!(directory.users(), before.as_slice());
        assert_eq!(directory.form().name, "Eve");
        assert_eq!(directory.api.calls().len(), calls_before + 1);
    }

    #[tokio::test]
    async fn edit_then_submit_updates_selected_user() {
        let mut directory = directory_with(&[("Ada", "ada@x.com"), ("Bob", "bob@x.com")]).await;
        let ada = directory.users().iter().find(|u| u.name == "Ada").unwrap().clone();

        directory.edit(&ada);
        assert_eq!(directory.editing(), Some(ada.id));
        assert_eq!(directory.form().email, "ada@x.com");

        directory.set_name("Ada Lovelace");
        assert!(directory.submit().await);

        assert_eq!(directory.editing(), None);
        assert_eq!(directory.success_notice().unwrap().text, "User updated successfully!");
        assert!(directory.users().iter().any(|u| u.name == "Ada Lovelace"));
        assert!(directory.api.calls().contains(&format!("update {}", ada.id)));
    }

    #[tokio::test]
    async fn cancel_edit_makes_no_request() {
        let mut directory = directory_with(&[("Ada", "ada@x.com")]).await;
        let ada = directory.users()[0].clone();
        let calls_before = directory.api.calls().len();

        directory.edit(&ada);
        directory.cancel_edit();

        assert_eq!(directory.editing(), None);
        assert_eq!(directory.form(), &UserForm::default());
        assert_eq!(directory.api.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn delete_waits_for_confirmation() {
        let mut directory = directory_with(&[("Ada", "ada@x.com")]).await;
        let id = directory.users()[0].id;
        let calls_before = directory.api.calls().len();

        directory.request_delete(id);
        directory.dismiss_delete();
        assert!(!directory.confirm_delete().await);
        assert_eq!(directory.api.calls().len(), calls_before);

        directory.request_delete(id);
        assert!(directory.confirm_delete().await);
        assert!(directory.users().is_empty());
        assert_eq!(directory.pending_delete(), None);
        assert_eq!(directory.success_notice().unwrap().text, "User deleted successfully!");
        assert_eq!(
            &directory.api.calls()[calls_before..],
            &[format!("delete {id}"), "list".to_string()]
        );
    }

    #[tokio::test]
    async fn transport_failures_use_fallback_text() {
        let mut directory = UserDirectory::new(FakeApi::offline());
        directory.mount().await;
        assert_eq!(directory.error_notice().unwrap().text, "Failed to connect to server");

        directory.set_name("Ada");
        directory.set_email("ada@x.com");
        assert!(!directory.submit().await);
        assert_eq!(directory.error_notice().unwrap().text, "Failed to save user");
        assert!(!directory.is_submitting());

        directory.request_delete(1);
        assert!(!directory.confirm_delete().await);
        assert_eq!(directory.error_notice().unwrap().text, "Failed to delete user");
    }

    #[tokio::test(start_paused = true)]
    async fn notices_vanish_after_three_seconds() {
        let mut directory = directory_with(&[("Ada", "ada@x.com")]).await;
        assert!(directory.success_notice().is_some());

        tokio::time::advance(Duration::from_millis(2_900)).await;
        assert!(directory.success_notice().is_some());
        assert!(!directory.expire_notices());

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(directory.success_notice().is_none());
        assert!(directory.expire_notices());
        assert_eq!(directory.notices().count(), 0);
    }

    #[tokio::test]
    async fn failed_refetch_keeps_save_confirmation() {
        let mut directory = UserDirectory::new(FakeApi {
            fail_listing: true,
            ..FakeApi::default()
        });
        directory.set_name("Ada");
        directory.set_email("ada@x.com");

        assert!(directory.submit().await);

        assert_eq!(directory.api.calls(), vec!["create", "list"]);
        assert_eq!(directory.success_notice().unwrap().text, "User created successfully!");
        assert_eq!(directory.error_notice().unwrap().text, "Failed to connect to server");
        let kinds: Vec<_> = directory.notices().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::Success, NoticeKind::Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn later_notice_extends_both_slots() {
        let mut directory = directory_with(&[("Ada", "ada@x.com")]).await;
        tokio::time::advance(Duration::from_secs(2)).await;

        directory.set_name("Eve");
        directory.set_email("ada@x.com");
        assert!(!directory.submit().await);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(directory.success_notice().is_some());
        assert!(directory.error_notice().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(directory.expire_notices());
        assert_eq!(directory.notices().count(), 0);
    }
}
