//! In-process storage engine (`DB_ENGINE=memory`).
//!
//! State lives only as long as the process. Each store owns its lock.

mod stats_repository;
mod url_repository;
mod user_repository;

pub use stats_repository::MemoryStatsRepository;
pub use url_repository::MemoryUrlRepository;
pub use user_repository::MemoryUserRepository;

use crate::domain::storage::{Storage, StorageBackend};
use crate::utils::password::CredentialHasher;

pub struct MemoryBackend;

impl StorageBackend for MemoryBackend {
    const ENGINE: &'static str = "memory";

    type UserId = u64;
    type Urls = MemoryUrlRepository;
    type Users = MemoryUserRepository;
    type Stats = MemoryStatsRepository;
}

/// Fresh, empty in-process stores.
pub fn storage(hasher: CredentialHasher) -> Storage<MemoryBackend> {
    Storage::new(
        MemoryUrlRepository::new(),
        MemoryUserRepository::new(hasher),
        MemoryStatsRepository::new(),
    )
}
