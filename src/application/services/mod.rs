//! Business logic services for the application layer.

pub mod auth_service;
pub mod link_service;
pub mod stats_service;
pub mod user_service;

pub use auth_service::{AccessDetails, AuthService, TokenConfig, TokenDetails};
pub use link_service::LinkService;
pub use stats_service::StatsService;
pub use user_service::UserService;
