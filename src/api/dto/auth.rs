//! DTOs for registration, login and token refresh.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::services::TokenDetails;

/// Request body for `POST /auth/register` and `POST /auth/login`.
///
/// Blank fields are rejected by the user service; here only the upper bounds
/// are checked. bcrypt ignores input past 72 bytes, so the password bound is
/// on its UTF-8 length rather than its character count.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(max = 64, message = "Username is too long"))]
    pub username: String,

    #[validate(custom(function = "validate_password_bytes"))]
    pub password: String,
}

/// Longest password bcrypt reads in full.
pub const MAX_PASSWORD_BYTES: usize = 72;

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("length").with_message("Password is too long".into()));
    }
    Ok(())
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Token pair handed to the client. Expiries are unix seconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub token_type: String,
    pub access_token: String,
    pub access_expires_at: i64,
    pub refresh_token: String,
    pub refresh_expires_at: i64,
}

impl TokenResponse {
    pub fn new(user_id: impl ToString, details: TokenDetails) -> Self {
        Self {
            user_id: user_id.to_string(),
            token_type: "Bearer".to_string(),
            access_token: details.access_token,
            access_expires_at: details.access_expires,
            refresh_token: details.refresh_token,
            refresh_expires_at: details.refresh_expires,
        }
    }
}
