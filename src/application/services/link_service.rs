//! Short link creation, resolution and renumbering.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::{StatsRepository, UrlRepository};
use crate::domain::storage::{Storage, StorageBackend};
use crate::error::AppError;
use crate::utils::codec::{encode, try_decode};
use crate::utils::url_normalizer::normalize_url;

type Link<B> = ShortLink<<B as StorageBackend>::UserId>;

pub struct LinkService<B: StorageBackend> {
    urls: Arc<B::Urls>,
    stats: Arc<B::Stats>,
}

impl<B: StorageBackend> LinkService<B> {
    pub fn new(storage: &Storage<B>) -> Self {
        Self {
            urls: storage.urls.clone(),
            stats: storage.stats.clone(),
        }
    }

    /// Normalizes `long_url`, stores it for `owner` and returns the new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute
    /// `http`/`https` URL.
    pub async fn shorten(&self, long_url: &str, owner: &B::UserId) -> Result<Link<B>, AppError> {
        let normalized = normalize_url(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let id = self.urls.save(&normalized, owner).await?;
        tracing::debug!(id, code = %encode(id), "Link created");

        self.urls.find_by_id(id).await
    }

    /// Looks a link up by its short code.
    ///
    /// Codes that are not canonical base-62 are reported as not found.
    pub async fn resolve(&self, code: &str) -> Result<Link<B>, AppError> {
        let id = try_decode(code).ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code }))
        })?;

        self.urls.find_by_id(id).await.map_err(|e| match e {
            AppError::NotFound { .. } => {
                AppError::not_found("Short link not found", json!({ "code": code }))
            }
            other => other,
        })
    }

    /// Resolves `code` and checks that `owner` owns the link.
    ///
    /// A link owned by someone else is reported as not found.
    pub async fn resolve_owned(&self, code: &str, owner: &B::UserId) -> Result<Link<B>, AppError> {
        let link = self.resolve(code).await?;
        if link.owner != *owner {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }
        Ok(link)
    }

    /// Moves the link at `old_code` to `new_code` and returns the new code.
    ///
    /// Recorded visits move with the link, so a code freed by the move
    /// carries no history.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if `old_code` does not name a link of `owner`
    /// - [`AppError::Validation`] if `new_code` is not a canonical short code
    /// - [`AppError::Conflict`] if `new_code` is already in use
    pub async fn change_link(
        &self,
        old_code: &str,
        new_code: &str,
        owner: &B::UserId,
    ) -> Result<String, AppError> {
        let link = self.resolve_owned(old_code, owner).await?;
        let new_id = self.urls.update(link.id, new_code).await?;

        if new_id != link.id {
            let moved = self.stats.move_visits(link.id, new_id).await?;
            tracing::debug!(moved, "Visits re-keyed");
        }

        tracing::info!(from = old_code, to = new_code, "Link renumbered");
        Ok(encode(new_id))
    }

    pub async fn list_for_user(&self, owner: &B::UserId) -> Result<Vec<Link<B>>, AppError> {
        self.urls.find_all_by_user(owner).await
    }

    pub async fn list_all(&self) -> Result<Vec<Link<B>>, AppError> {
        self.urls.find_all().await
    }
}
