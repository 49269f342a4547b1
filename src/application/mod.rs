//! Application layer services implementing business logic.
//!
//! Services are generic over a [`crate::domain::storage::StorageBackend`] and
//! hold the stores they need, so handlers never see a concrete engine.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shorten, resolve and renumber links
//! - [`services::user_service::UserService`] - Registration and credential checks
//! - [`services::stats_service::StatsService`] - Visit recording and queries
//! - [`services::auth_service::AuthService`] - JWT issuance, verification and revocation

pub mod services;
