//! In-process credential store.
//!
//! Backs `serve --in-memory` and the integration tests. Both maps sit under
//! one lock so create-if-absent is a single critical section.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::user_repository::UserRepository;
use crate::errors::{AppError, AppResult};
use domain::{normalize_email, NewUser, Password, User, UserCredentials};

#[derive(Default)]
struct Inner {
    by_id: HashMap<Uuid, StoredUser>,
    by_email: HashMap<String, Uuid>,
}

struct StoredUser {
    user: User,
    password: Password,
}

/// HashMap-backed implementation of UserRepository
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.by_id.get(&id).map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .find_credentials_by_email(email)
            .await?
            .map(|credentials| credentials.user))
    }

    async fn find_credentials_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        let email = normalize_email(email);
        let inner = self.inner.read().await;

        let credentials = inner
            .by_email
            .get(&email)
            .and_then(|id| inner.by_id.get(id))
            .map(|stored| UserCredentials {
                user: stored.user.clone(),
                password: stored.password.clone(),
            });

        Ok(credentials)
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let email = normalize_email(&user.email);
        let mut inner = self.inner.write().await;

        if inner.by_email.contains_key(&email) {
            return Err(AppError::DuplicateEmail);
        }

        let now = chrono::Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: email.clone(),
            created_at: now,
            updated_at: now,
        };

        inner.by_email.insert(email, created.id);
        inner.by_id.insert(
            created.id,
            StoredUser {
                user: created.clone(),
                password: user.password,
            },
        );

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Sarah".to_string(),
            email: email.to_string(),
            password: Password::from_hash("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA"),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("sarah@x.com")).await.unwrap();

        let by_id = store.find_by_id(user.id).await.unwrap();
        assert_eq!(by_id, Some(user.clone()));

        let by_email = store.find_by_email("sarah@x.com").await.unwrap();
        assert_eq!(by_email, Some(user));
    }

    #[tokio::test]
    async fn test_lookup_is_normalized() {
        let store = MemoryUserStore::new();
        store.create(new_user("sarah@x.com")).await.unwrap();

        assert!(store.find_by_email(" SARAH@x.com ").await.unwrap().is_some());
        let credentials = store
            .find_credentials_by_email("Sarah@X.com")
            .await
            .unwrap()
            .unwrap();
        assert!(credentials.password.as_str().starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@b.com")).await.unwrap();

        let err = store.create(new_user(" A@B.com ")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_create_single_winner() {
        let store = Arc::new(MemoryUserStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_user("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(AppError::DuplicateEmail) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(duplicates, 7);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let store = MemoryUserStore::new();
        assert!(store.is_empty().await);
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.find_by_email("nobody@x.com").await.unwrap().is_none());
    }
}
