use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    context::{ContextError, RegistrationContext},
    domain::{
        email::Email,
        user::{User, UserId},
    },
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserStoreError {
    /// Uniqueness violation detected by the store itself.
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
    #[error("Store call interrupted: {0}")]
    Interrupted(#[from] ContextError),
}

/// Persistence of user records, keyed by email for uniqueness.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `Ok(None)` means no record has this email. Errors are operational only.
    async fn get_user_by_email(
        &self,
        ctx: &RegistrationContext,
        email: &Email,
    ) -> Result<Option<User>, UserStoreError>;

    /// Fails with [`UserStoreError::UserAlreadyExists`] if the email is taken.
    async fn create_user(
        &self,
        ctx: &RegistrationContext,
        user: User,
    ) -> Result<(), UserStoreError>;

    async fn update_user(
        &self,
        ctx: &RegistrationContext,
        user: User,
    ) -> Result<(), UserStoreError>;

    async fn delete_user(
        &self,
        ctx: &RegistrationContext,
        user_id: &UserId,
    ) -> Result<(), UserStoreError>;
}

#[async_trait]
impl<T> UserStore for Arc<T>
where
    T: UserStore + ?Sized,
{
    async fn get_user_by_email(
        &self,
        ctx: &RegistrationContext,
        email: &Email,
    ) -> Result<Option<User>, UserStoreError> {
        (**self).get_user_by_email(ctx, email).await
    }

    async fn create_user(
        &self,
        ctx: &RegistrationContext,
        user: User,
    ) -> Result<(), UserStoreError> {
        (**self).create_user(ctx, user).await
    }

    async fn update_user(
        &self,
        ctx: &RegistrationContext,
        user: User,
    ) -> Result<(), UserStoreError> {
        (**self).update_user(ctx, user).await
    }

    async fn delete_user(
        &self,
        ctx: &RegistrationContext,
        user_id: &UserId,
    ) -> Result<(), UserStoreError> {
        (**self).delete_user(ctx, user_id).await
    }
}
