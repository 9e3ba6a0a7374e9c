//! Storage access ports and their SQLite implementations.
//!
//! Services depend only on the `*Port` traits so they can run against the
//! SQLite repositories in production and against in-memory doubles in tests.
//!
//! `save` inserts when the entity has no id yet (assigning one) and updates
//! it otherwise. Association pairs are only ever added, never removed.

use crate::database::models::{Event, Logistics, Participant, Role};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod event_repository;
pub mod logistics_repository;
pub mod participant_repository;

#[async_trait]
pub trait EventPort: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;

    /// Exact match on the unique description.
    async fn find_by_description(&self, description: &str) -> Result<Option<Event>>;

    /// Events whose start date lies in `[start, end]`, ordered by start date.
    async fn find_by_start_date_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Event>>;

    /// Events attached to at least one participant matching all three fields.
    async fn find_by_participant(
        &self,
        name: &str,
        first_name: &str,
        role: Role,
    ) -> Result<Vec<Event>>;

    /// Persists the event together with its logistics items and participant pairs.
    async fn save(&self, event: Event) -> Result<Event>;
}

#[async_trait]
pub trait ParticipantPort: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Participant>>;

    /// Persists the participant together with its event pairs.
    async fn save(&self, participant: Participant) -> Result<Participant>;
}

#[async_trait]
pub trait LogisticsPort: Send + Sync {
    async fn save(&self, logistics: Logistics) -> Result<Logistics>;
}
