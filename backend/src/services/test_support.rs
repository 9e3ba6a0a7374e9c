//! In-memory port doubles for service tests.
//!
//! Each double keeps a store that `find_*` reads and `save` upserts into, and
//! records every `save` call so tests can verify what was persisted.

use crate::database::models::{Event, Logistics, Participant, Role};
use crate::repositories::{EventPort, LogisticsPort, ParticipantPort};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;

const FIRST_GENERATED_ID: i64 = 100;

fn next_id(counter: &mut i64) -> i64 {
    if *counter < FIRST_GENERATED_ID {
        *counter = FIRST_GENERATED_ID;
    }
    let id = *counter;
    *counter += 1;
    id
}

#[derive(Default)]
struct EventState {
    stored: Vec<Event>,
    /// Ids of the events returned by `find_by_participant`.
    participant_matches: Vec<i64>,
    participant_queries: Vec<(String, String, Role)>,
    saved: Vec<Event>,
    next_id: i64,
}

impl EventState {
    fn upsert(&mut self, mut event: Event) -> Event {
        let id = match event.id {
            Some(id) => id,
            None => next_id(&mut self.next_id),
        };
        event.id = Some(id);
        for item in &mut event.logistics {
            item.event_id = Some(id);
        }
        match self.stored.iter_mut().find(|e| e.id == Some(id)) {
            Some(existing) => *existing = event.clone(),
            None => self.stored.push(event.clone()),
        }
        event
    }
}

#[derive(Clone, Default)]
pub struct MockEventPort {
    state: Arc<Mutex<EventState>>,
}

impl MockEventPort {
    /// Seeds the store without recording a save.
    pub async fn insert(&self, event: Event) -> Event {
        self.state.lock().await.upsert(event)
    }

    /// Seeds the store and makes the event match any participant query.
    pub async fn insert_for_participant(&self, event: Event) -> Event {
        let mut state = self.state.lock().await;
        let event = state.upsert(event);
        if let Some(id) = event.id {
            state.participant_matches.push(id);
        }
        event
    }

    pub async fn saved(&self) -> Vec<Event> {
        self.state.lock().await.saved.clone()
    }

    pub async fn participant_queries(&self) -> Vec<(String, String, Role)> {
        self.state.lock().await.participant_queries.clone()
    }
}

#[async_trait]
impl EventPort for MockEventPort {
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let state = self.state.lock().await;
        Ok(state.stored.iter().find(|e| e.id == Some(id)).cloned())
    }

    async fn find_by_description(&self, description: &str) -> Result<Option<Event>> {
        let state = self.state.lock().await;
        Ok(state
            .stored
            .iter()
            .find(|e| e.description == description)
            .cloned())
    }

    async fn find_by_start_date_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Event>> {
        let state = self.state.lock().await;
        let mut events: Vec<Event> = state
            .stored
            .iter()
            .filter(|e| e.start_date >= start && e.start_date <= end)
            .cloned()
            .collect();
        events.sort_by_key(|e| (e.start_date, e.id));
        Ok(events)
    }

    async fn find_by_participant(
        &self,
        name: &str,
        first_name: &str,
        role: Role,
    ) -> Result<Vec<Event>> {
        let mut state = self.state.lock().await;
        state
            .participant_queries
            .push((name.to_string(), first_name.to_string(), role));
        Ok(state
            .stored
            .iter()
            .filter(|e| e.id.is_some_and(|id| state.participant_matches.contains(&id)))
            .cloned()
            .collect())
    }

    async fn save(&self, event: Event) -> Result<Event> {
        let mut state = self.state.lock().await;
        let event = state.upsert(event);
        state.saved.push(event.clone());
        Ok(event)
    }
}

#[derive(Default)]
struct ParticipantState {
    stored: Vec<Participant>,
    saved: Vec<Participant>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct MockParticipantPort {
    state: Arc<Mutex<ParticipantState>>,
}

impl MockParticipantPort {
    /// Seeds the store without recording a save.
    pub async fn insert(&self, participant: Participant) {
        self.state.lock().await.stored.push(participant);
    }

    pub async fn get(&self, id: i64) -> Option<Participant> {
        let state = self.state.lock().await;
        state.stored.iter().find(|p| p.id == Some(id)).cloned()
    }

    pub async fn saved(&self) -> Vec<Participant> {
        self.state.lock().await.saved.clone()
    }
}

#[async_trait]
impl ParticipantPort for MockParticipantPort {
    async fn find_by_id(&self, id: i64) -> Result<Option<Participant>> {
        Ok(self.get(id).await)
    }

    async fn save(&self, mut participant: Participant) -> Result<Participant> {
        let mut state = self.state.lock().await;
        if participant.id.is_none() {
            participant.id = Some(next_id(&mut state.next_id));
        }
        match state.stored.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant.clone(),
            None => state.stored.push(participant.clone()),
        }
        state.saved.push(participant.clone());
        Ok(participant)
    }
}

#[derive(Default)]
struct LogisticsState {
    saved: Vec<Logistics>,
    next_id: i64,
}

#[derive(Clone, Default)]
pub struct MockLogisticsPort {
    state: Arc<Mutex<LogisticsState>>,
}

impl MockLogisticsPort {
    pub async fn saved(&self) -> Vec<Logistics> {
        self.state.lock().await.saved.clone()
    }
}

#[async_trait]
impl LogisticsPort for MockLogisticsPort {
    async fn save(&self, mut logistics: Logistics) -> Result<Logistics> {
        let mut state = self.state.lock().await;
        if logistics.id.is_none() {
            logistics.id = Some(next_id(&mut state.next_id));
        }
        state.saved.push(logistics.clone());
        Ok(logistics)
    }
}
