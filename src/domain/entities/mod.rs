//! Core domain entities.
//!
//! Entities are generic over the owning user's key type `K`, which is fixed
//! per storage engine (see [`crate::domain::storage::StorageBackend::UserId`]).
//!
//! - [`ShortLink`] - A long URL and the id its short code is derived from
//! - [`User`] - A registered account
//! - [`VisitStat`] - A recorded redirect

pub mod link;
pub mod user;
pub mod visit;

pub use link::ShortLink;
pub use user::User;
pub use visit::{RequestHeaders, VisitStat};
