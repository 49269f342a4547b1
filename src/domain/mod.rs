//! Domain layer: entities, store contracts and visit processing.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Store traits implemented by every engine
//! - [`storage`] - Engine abstraction tying a user key type to its stores
//! - [`visit_event`] - Visit tracking event model
//! - [`visit_worker`] - Asynchronous visit recording
//!
//! # Visit Processing Flow
//!
//! 1. The redirect handler resolves the short code
//! 2. A [`visit_event::VisitEvent`] is offered to a bounded channel
//! 3. [`visit_worker::run_visit_worker`] writes it through [`crate::application::services::StatsService`]

pub mod entities;
pub mod repositories;
pub mod storage;
pub mod visit_event;
pub mod visit_worker;
