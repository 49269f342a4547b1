//! Repository trait for user accounts.

use crate::domain::entities::User;
use crate::domain::storage::UserKey;
use crate::error::AppError;
use crate::utils::password::CredentialHasher;
use async_trait::async_trait;
use serde_json::json;

/// Persistent user accounts.
///
/// Username uniqueness is enforced by the insert itself, so two concurrent
/// registrations of the same name cannot both succeed.
#[async_trait]
pub trait UserRepository<K: UserKey>: Send + Sync + 'static {
    /// Hasher used for stored credentials.
    fn hasher(&self) -> &CredentialHasher;

    /// Hashes `password` and inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username is taken.
    async fn add_user(&self, username: &str, password: &str) -> Result<User<K>, AppError>;

    async fn user_exists(&self, username: &str) -> Result<bool, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such user exists.
    async fn find_by_username(&self, username: &str) -> Result<User<K>, AppError>;

    /// `Ok(false)` for an unknown user and for a wrong password alike.
    async fn validate_user_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, AppError> {
        match self.find_by_username(username).await {
            Ok(user) => {
                self.hasher()
                    .verify_async(&user.password_hash, password)
                    .await
            }
            Err(AppError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn find_all(&self) -> Result<Vec<User<K>>, AppError>;
}

pub fn username_taken(username: &str) -> AppError {
    AppError::conflict(
        "Username is already taken",
        json!({ "username": username }),
    )
}

pub fn user_not_found(username: &str) -> AppError {
    AppError::not_found("User not found", json!({ "username": username }))
}
