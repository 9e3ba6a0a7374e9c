//! Event management backend.
//!
//! Associates participants with events, attaches logistics items to events
//! and keeps each event's cost equal to the total of its reserved logistics.

pub mod config;
pub mod database;
pub mod errors;
pub mod repositories;
pub mod services;

pub use errors::{ServiceError, ServiceResult};
pub use services::event_services::{CostFilter, EventServices};
