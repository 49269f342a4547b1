//! DTOs for link creation, listing and renumbering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /api/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Absolute `http`/`https` URL to shorten.
    #[validate(length(min = 1, max = 8192, message = "URL must be 1 to 8192 characters"))]
    pub url: String,
}

/// Request body for `PATCH /api/links/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    /// Short code the link should move to.
    #[validate(length(min = 1, max = 11, message = "Code must be 1 to 11 characters"))]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateLinkResponse {
    pub old_code: String,
    pub code: String,
    pub short_url: String,
}
