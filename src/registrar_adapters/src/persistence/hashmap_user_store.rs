use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use registrar_core::{Email, RegistrationContext, User, UserId, UserStore, UserStoreError};

/// User store backed by a shared in-memory map.
///
/// Uniqueness of emails and user ids is checked and enforced under a single
/// write lock, so concurrent creates for the same user cannot both succeed.
#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<Email, User>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn contains(&self, email: &Email) -> bool {
        self.users.read().await.contains_key(email)
    }
}

fn email_of(users: &HashMap<Email, User>, user_id: &UserId) -> Option<Email> {
    users
        .values()
        .find(|user| user.id() == user_id)
        .map(|user| user.email().clone())
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    #[tracing::instrument(name = "Retrieving user from HashMapUserStore", skip_all)]
    async fn get_user_by_email(
        &self,
        ctx: &RegistrationContext,
        email: &Email,
    ) -> Result<Option<User>, UserStoreError> {
        ctx.check()?;
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    #[tracing::instrument(name = "Adding user to HashMapUserStore", skip_all)]
    async fn create_user(
        &self,
        ctx: &RegistrationContext,
        user: User,
    ) -> Result<(), UserStoreError> {
        ctx.check()?;
        let mut users = self.users.write().await;
        if users.contains_key(user.email()) || email_of(&users, user.id()).is_some() {
            return Err(UserStoreError::UserAlreadyExists);
        }
        users.insert(user.email().clone(), user);
        Ok(())
    }

    #[tracing::instrument(name = "Updating user in HashMapUserStore", skip_all)]
    async fn update_user(
        &self,
        ctx: &RegistrationContext,
        user: User,
    ) -> Result<(), UserStoreError> {
        ctx.check()?;
        let mut users = self.users.write().await;
        let current_email = email_of(&users, user.id()).ok_or(UserStoreError::UserNotFound)?;

        if &current_email != user.email() {
            if users.contains_key(user.email()) {
                return Err(UserStoreError::UserAlreadyExists);
            }
            users.remove(&current_email);
        }

        users.insert(user.email().clone(), user);
        Ok(())
    }

    #[tracing::instrument(name = "Deleting user from HashMapUserStore", skip_all)]
    async fn delete_user(
        &self,
        ctx: &RegistrationContext,
        user_id: &UserId,
    ) -> Result<(), UserStoreError> {
        ctx.check()?;
        let mut users = self.users.write().await;
        let email = email_of(&users, user_id).ok_or(UserStoreError::UserNotFound)?;
        users.remove(&email);
        Ok(())
    }
}
