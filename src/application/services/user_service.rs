//! Registration and credential checks.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::domain::storage::{Storage, StorageBackend};
use crate::error::AppError;

type Account<B> = User<<B as StorageBackend>::UserId>;

pub struct UserService<B: StorageBackend> {
    users: Arc<B::Users>,
}

impl<B: StorageBackend> UserService<B> {
    pub fn new(storage: &Storage<B>) -> Self {
        Self {
            users: storage.users.clone(),
        }
    }

    /// Creates an account.
    ///
    /// Surrounding whitespace is trimmed from the username; the password is
    /// used as given.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if either field is blank
    /// - [`AppError::Conflict`] if the username is taken
    pub async fn register(&self, username: &str, password: &str) -> Result<Account<B>, AppError> {
        let username = username.trim();

        let mut blank = Vec::new();
        if username.is_empty() {
            blank.push("username");
        }
        if password.trim().is_empty() {
            blank.push("password");
        }
        if !blank.is_empty() {
            return Err(AppError::bad_request(
                "Username and password must not be empty",
                json!({ "fields": blank }),
            ));
        }

        // Fast path only; the insert enforces uniqueness.
        if self.users.user_exists(username).await? {
            return Err(AppError::conflict(
                "Username is already taken",
                json!({ "username": username }),
            ));
        }

        let user = self.users.add_user(username, password).await?;
        tracing::info!(username = %user.username, "User registered");
        Ok(user)
    }

    /// Returns the account if the credentials match.
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account<B>, AppError> {
        let username = username.trim();

        if !self
            .users
            .validate_user_and_password(username, password)
            .await?
        {
            return Err(invalid_credentials());
        }

        self.users
            .find_by_username(username)
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => invalid_credentials(),
                other => other,
            })
    }

    pub async fn list_users(&self) -> Result<Vec<Account<B>>, AppError> {
        self.users.find_all().await
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}
