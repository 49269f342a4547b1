//! JWT access/refresh tokens backed by a revocable side-store.
//!
//! Every issued token carries a random UUID. The UUIDs of live tokens are kept
//! in a [`SessionStore`] mapped to the user id, with a TTL equal to the
//! token's remaining lifetime. A token is accepted only while its UUID is
//! present, so deleting the entry revokes it before the JWT expires.

use axum::http::{HeaderMap, header};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::domain::storage::UserKey;
use crate::error::AppError;
use crate::infrastructure::session::SessionStore;

/// Signing secrets and lifetimes.
#[derive(Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub access_uuid: String,
    pub user_id: String,
    pub authorized: bool,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub refresh_uuid: String,
    pub user_id: String,
    pub exp: i64,
}

/// A freshly issued token pair. Expiries are unix seconds.
#[derive(Debug, Clone, Serialize)]
pub struct TokenDetails {
    pub access_token: String,
    pub refresh_token: String,
    pub access_id: String,
    pub refresh_id: String,
    pub access_expires: i64,
    pub refresh_expires: i64,
}

/// Identity carried by a verified access token.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessDetails<K> {
    pub access_id: String,
    pub user_id: K,
}

pub struct AuthService {
    store: Arc<dyn SessionStore>,
    config: TokenConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn SessionStore>, config: TokenConfig) -> Self {
        Self { store, config }
    }

    /// Signs a new access/refresh pair for `user_id`.
    ///
    /// Nothing is stored yet; see [`Self::persist`].
    pub fn issue<K: UserKey>(&self, user_id: &K) -> Result<TokenDetails, AppError> {
        let now = Utc::now().timestamp();
        let access_expires = now + self.config.access_ttl.as_secs() as i64;
        let refresh_expires = now + self.config.refresh_ttl.as_secs() as i64;

        let access_id = Uuid::new_v4().to_string();
        let refresh_id = Uuid::new_v4().to_string();

        let access_claims = AccessClaims {
            access_uuid: access_id.clone(),
            user_id: user_id.to_string(),
            authorized: true,
            exp: access_expires,
        };
        let refresh_claims = RefreshClaims {
            refresh_uuid: refresh_id.clone(),
            user_id: user_id.to_string(),
            exp: refresh_expires,
        };

        let header = Header::new(Algorithm::HS256);
        let access_token = encode(
            &header,
            &access_claims,
            &EncodingKey::from_secret(self.config.access_secret.as_bytes()),
        )
        .map_err(signing_error)?;
        let refresh_token = encode(
            &header,
            &refresh_claims,
            &EncodingKey::from_secret(self.config.refresh_secret.as_bytes()),
        )
        .map_err(signing_error)?;

        Ok(TokenDetails {
            access_token,
            refresh_token,
            access_id,
            refresh_id,
            access_expires,
            refresh_expires,
        })
    }

    /// Records both token ids in the side-store until their expiry.
    ///
    /// # Errors
    ///
    /// Side-store failures surface as [`AppError::Storage`]; the caller must
    /// not hand the tokens out in that case.
    pub async fn persist<K: UserKey>(
        &self,
        user_id: &K,
        details: &TokenDetails,
    ) -> Result<(), AppError> {
        let now = Utc::now().timestamp();
        let user = user_id.to_string();

        self.store
            .set(&details.access_id, &user, remaining(details.access_expires, now))
            .await?;
        self.store
            .set(
                &details.refresh_id,
                &user,
                remaining(details.refresh_expires, now),
            )
            .await?;

        Ok(())
    }

    /// [`Self::issue`] followed by [`Self::persist`].
    pub async fn start_session<K: UserKey>(&self, user_id: &K) -> Result<TokenDetails, AppError> {
        let details = self.issue(user_id)?;
        self.persist(user_id, &details).await?;
        Ok(details)
    }

    /// Token part of `Authorization: <scheme> <token>`.
    ///
    /// Returns `""` unless the header splits on a single space into exactly
    /// two fields; an empty token then fails verification.
    pub fn bearer_token(headers: &HeaderMap) -> &str {
        let Some(value) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return "";
        };

        let fields: Vec<&str> = value.split(' ').collect();
        match fields.as_slice() {
            [_, token] => *token,
            _ => "",
        }
    }

    /// Verifies the access token of a request and returns its claims.
    pub fn extract<K: UserKey>(&self, headers: &HeaderMap) -> Result<AccessDetails<K>, AppError> {
        let token = Self::bearer_token(headers);

        let claims = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.config.access_secret.as_bytes()),
            &hmac_validation(),
        )
        .map_err(|e| {
            debug!("Access token rejected: {}", e);
            unauthorized()
        })?
        .claims;

        let user_id = K::parse_key(&claims.user_id).ok_or_else(|| {
            debug!("Access token carries a foreign user id");
            unauthorized()
        })?;

        if claims.access_uuid.is_empty() {
            debug!("Access token without identifier");
            return Err(unauthorized());
        }

        Ok(AccessDetails {
            access_id: claims.access_uuid,
            user_id,
        })
    }

    /// User id stored for a live token id.
    pub async fn resolve<K: UserKey>(&self, token_id: &str) -> Result<K, AppError> {
        let stored = self.store.get(token_id).await?.ok_or_else(|| {
            debug!("Token {} is revoked or expired", token_id);
            unauthorized()
        })?;

        K::parse_key(&stored).ok_or_else(|| {
            debug!("Unparseable user id stored for token {}", token_id);
            unauthorized()
        })
    }

    /// Verifies the request's access token and checks it is still live and
    /// belongs to the user it names.
    pub async fn authenticate<K: UserKey>(
        &self,
        headers: &HeaderMap,
    ) -> Result<AccessDetails<K>, AppError> {
        let details = self.extract::<K>(headers)?;
        let stored: K = self.resolve(&details.access_id).await?;

        if stored != details.user_id {
            debug!("Token {} is bound to another user", details.access_id);
            return Err(unauthorized());
        }

        Ok(details)
    }

    /// Deletes a token id and returns how many entries were removed.
    pub async fn revoke(&self, token_id: &str) -> Result<u64, AppError> {
        self.store.delete(token_id).await
    }

    /// Ends the session of an access token. Succeeds only if exactly one
    /// live entry was removed.
    pub async fn logout(&self, access_id: &str) -> Result<(), AppError> {
        match self.revoke(access_id).await? {
            1 => Ok(()),
            n => {
                debug!("Logout removed {} entries for {}", n, access_id);
                Err(unauthorized())
            }
        }
    }

    /// Exchanges a live refresh token for a new pair.
    ///
    /// The old refresh id is deleted before the new pair is stored, so each
    /// refresh token works once.
    pub async fn refresh<K: UserKey>(
        &self,
        refresh_token: &str,
    ) -> Result<(K, TokenDetails), AppError> {
        let claims = decode::<RefreshClaims>(
            refresh_token,
            &DecodingKey::from_secret(self.config.refresh_secret.as_bytes()),
            &hmac_validation(),
        )
        .map_err(|e| {
            debug!("Refresh token rejected: {}", e);
            unauthorized()
        })?
        .claims;

        let user_id = K::parse_key(&claims.user_id).ok_or_else(unauthorized)?;
        let stored: K = self.resolve(&claims.refresh_uuid).await?;
        if stored != user_id {
            return Err(unauthorized());
        }

        if self.revoke(&claims.refresh_uuid).await? != 1 {
            // Lost a race with another refresh of the same token.
            return Err(unauthorized());
        }

        let details = self.start_session(&user_id).await?;
        Ok((user_id, details))
    }

    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }
}

fn hmac_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation
}

fn remaining(expires_at: i64, now: i64) -> Duration {
    Duration::from_secs(expires_at.saturating_sub(now).max(1) as u64)
}

fn unauthorized() -> AppError {
    AppError::unauthorized("Unauthorized", json!({}))
}

fn signing_error(e: jsonwebtoken::errors::Error) -> AppError {
    tracing::error!("Failed to sign token: {}", e);
    AppError::storage("Failed to issue token", json!({}))
}
