//! Token side-store.
//!
//! Provides a [`SessionStore`] trait with two implementations:
//! - [`RedisSessionStore`] - Production Redis-backed store
//! - [`MemorySessionStore`] - In-process store used when Redis is not configured

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use service::SessionStore;

#[cfg(test)]
pub use service::MockSessionStore;
