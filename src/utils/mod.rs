//! Helpers shared across layers.
//!
//! - [`codec`] - Base-62 short code encoding
//! - [`password`] - Credential hashing
//! - [`url_normalizer`] - URL normalization and sanitization
//! - [`db_error`] - Driver error classification

pub mod codec;
pub mod db_error;
pub mod password;
pub mod url_normalizer;
