//! Repository trait definitions for the domain layer.
//!
//! Every storage engine implements all three traits for its own user key type.
//! Implementations live in [`crate::infrastructure::persistence`].
//!
//! - [`UrlRepository`] - Short link storage and id allocation
//! - [`UserRepository`] - Accounts and credential checks
//! - [`StatsRepository`] - Visit log
//!
//! See `tests/repository_*.rs` for the behaviour shared by all engines.

pub mod stats_repository;
pub mod url_repository;
pub mod user_repository;

pub use stats_repository::StatsRepository;
pub use url_repository::UrlRepository;
pub use user_repository::UserRepository;
