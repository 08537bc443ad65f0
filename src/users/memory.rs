use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    model::User,
    repo::{StoreError, UserStore},
};

/// In-process store with the same uniqueness guarantees as the Postgres
/// table.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    users: HashMap<i64, User>,
}

impl Inner {
    fn email_taken_by_other(&self, email: &str, id: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != id)
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken_by_other(email, None) {
            return Err(StoreError::DuplicateEmail);
        }
        inner.last_id += 1;
        let user = User {
            id: inner.last_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn update_email(&self, id: i64, email: &str) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&id) {
            return Ok(None);
        }
        if inner.email_taken_by_other(email, Some(id)) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = inner.users.get_mut(&id).map(|u| {
            u.email = email.to_string();
            u.clone()
        });
        Ok(user)
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(u) => {
                u.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = MemoryUserStore::new();
        let a = store.create("a@x.com", "h1").await.unwrap();
        let b = store.create("b@x.com", "h2").await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.find_by_email("b@x.com").await.unwrap(), Some(b));
        assert_eq!(store.find_by_id(1).await.unwrap(), Some(a));
        assert_eq!(store.find_by_id(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn email_is_case_sensitive() {
        let store = MemoryUserStore::new();
        store.create("a@x.com", "h").await.unwrap();
        assert!(store.create("A@x.com", "h").await.is_ok());
        assert!(store.find_by_email("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_email_on_create_and_update() {
        let store = MemoryUserStore::new();
        store.create("a@x.com", "h").await.unwrap();
        let b = store.create("b@x.com", "h").await.unwrap();

        assert!(matches!(
            store.create("a@x.com", "h").await,
            Err(StoreError::DuplicateEmail)
        ));
        assert!(matches!(
            store.update_email(b.id, "a@x.com").await,
            Err(StoreError::DuplicateEmail)
        ));
        // own email is not a conflict
        let same = store.update_email(b.id, "b@x.com").await.unwrap().unwrap();
        assert_eq!(same.email, "b@x.com");
    }

    #[tokio::test]
    async fn updates_on_missing_user() {
        let store = MemoryUserStore::new();
        assert_eq!(store.update_email(42, "z@x.com").await.unwrap(), None);
        assert!(!store.update_password_hash(42, "h").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_creates_keep_one_record_per_email() {
        let store = Arc::new(MemoryUserStore::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create("race@x.com", "h").await.is_ok()
            }));
        }
        let mut created = 0;
        for h in handles {
            if h.await.unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }
}
