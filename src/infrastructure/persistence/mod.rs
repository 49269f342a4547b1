//! Storage engine implementations.
//!
//! Each engine implements [`crate::domain::repositories`] for its own user key:
//!
//! - [`memory`] - In-process maps, `u64` user ids
//! - [`mongo`] - MongoDB collections, `ObjectId` user ids
//! - [`postgres`] - PostgreSQL tables, `BIGSERIAL` user ids

pub mod memory;
pub mod mongo;
pub mod postgres;
