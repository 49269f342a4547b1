//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`persistence`] - Storage engines (in-process, MongoDB, PostgreSQL)
//! - [`session`] - Token side-store (Redis or in-process)

pub mod persistence;
pub mod session;
