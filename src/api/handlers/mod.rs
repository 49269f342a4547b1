//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.
//! Handlers are generic over the storage backend of the [`crate::state::AppState`].

pub mod auth;
pub mod health;
pub mod links;
pub mod redirect;
pub mod stats;

pub use auth::{login_handler, logout_handler, refresh_handler, register_handler};
pub use health::health_handler;
pub use links::{list_links_handler, shorten_handler, update_link_handler};
pub use redirect::redirect_handler;
pub use stats::{link_stats_handler, stats_handler};
