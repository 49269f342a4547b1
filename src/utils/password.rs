//! Salted one-way credential hashing (bcrypt).

use crate::error::AppError;
use serde_json::json;

/// Work factor used when none is configured.
pub const DEFAULT_COST: u32 = 10;

/// Smallest and largest work factors bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hashes and verifies passwords with a fixed bcrypt work factor.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produces a salted digest; hashing the same password twice yields
    /// different strings.
    pub fn hash(&self, password: &[u8]) -> Result<String, AppError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// `Ok(false)` on mismatch. A digest that is not valid bcrypt is an error.
    pub fn verify(&self, hash: &str, password: &[u8]) -> Result<bool, AppError> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// [`Self::hash`] on the blocking pool.
    pub async fn hash_async(&self, password: &str) -> Result<String, AppError> {
        let hasher = *self;
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(password.as_bytes()))
            .await
            .map_err(join_error)?
    }

    /// [`Self::verify`] on the blocking pool.
    pub async fn verify_async(&self, hash: &str, password: &str) -> Result<bool, AppError> {
        let hasher = *self;
        let hash = hash.to_owned();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, password.as_bytes()))
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: tokio::task::JoinError) -> AppError {
    tracing::error!("Hashing task failed: {}", e);
    AppError::storage("Credential hashing error", json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(MIN_COST)
    }

    #[test]
    fn test_hash_is_salted() {
        let h1 = hasher().hash(b"secret123").unwrap();
        let h2 = hasher().hash(b"secret123").unwrap();

        assert_ne!(h1, h2);
        assert!(hasher().verify(&h1, b"secret123").unwrap());
        assert!(hasher().verify(&h2, b"secret123").unwrap());
    }

    #[test]
    fn test_verify_mismatch_is_false() {
        let h = hasher().hash(b"secret123").unwrap();
        assert!(!hasher().verify(&h, b"wrong").unwrap());
    }

    #[test]
    fn test_verify_malformed_hash_is_error() {
        let result = hasher().verify("not-a-bcrypt-hash", b"secret123");
        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(CredentialHasher::default().cost(), 10);
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let h = hasher().hash_async("pa55word").await.unwrap();
        assert!(hasher().verify_async(&h, "pa55word").await.unwrap());
        assert!(!hasher().verify_async(&h, "pa55w0rd").await.unwrap());
    }
}
