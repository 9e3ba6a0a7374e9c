//! Module for core business logic services.
//!
//! `event_services` holds the association and cost operations over the
//! repository ports; `cost_schedule` drives the cost recomputation
//! periodically.

pub mod cost_schedule;
pub mod event_services;

#[cfg(test)]
pub(crate) mod test_support;
