//! Event business logic service.
//!
//! Associates participants and logistics items with events and keeps each
//! event's cost in line with its reserved logistics.

use crate::database::models::{Event, Logistics, Participant, Role};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::{EventPort, LogisticsPort, ParticipantPort};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Selects the events whose cost is recomputed by `calcul_cout`: every event
/// attached to a participant matching all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostFilter {
    pub name: String,
    pub first_name: String,
    pub role: Role,
}

impl Default for CostFilter {
    fn default() -> Self {
        Self {
            name: "Tounsi".to_string(),
            first_name: "Ahmed".to_string(),
            role: Role::Organisateur,
        }
    }
}

/// Service layer for event operations.
pub struct EventServices<E, P, L> {
    events: E,
    participants: P,
    logistics: L,
    cost_filter: CostFilter,
}

impl<E, P, L> EventServices<E, P, L>
where
    E: EventPort,
    P: ParticipantPort,
    L: LogisticsPort,
{
    /// Creates a new EventServices instance using the default cost filter.
    pub fn new(events: E, participants: P, logistics: L) -> Self {
        Self {
            events,
            participants,
            logistics,
            cost_filter: CostFilter::default(),
        }
    }

    pub fn with_cost_filter(mut self, cost_filter: CostFilter) -> Self {
        self.cost_filter = cost_filter;
        self
    }

    pub fn cost_filter(&self) -> &CostFilter {
        &self.cost_filter
    }

    /// Persists a new participant unchanged.
    pub async fn add_participant(&self, participant: Participant) -> ServiceResult<Participant> {
        let participant = self.participants.save(participant).await?;
        info!(
            "Participant {} {} saved with id {:?}",
            participant.first_name, participant.name, participant.id
        );
        Ok(participant)
    }

    /// Attaches `event` to the participant with the given id.
    ///
    /// The event is saved first so that it has an id, then the participant
    /// side of the pair is saved too.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the participant doesn't exist. In
    /// that case nothing is saved.
    pub async fn add_affect_even_participant(
        &self,
        mut event: Event,
        participant_id: i64,
    ) -> ServiceResult<Event> {
        let mut participant = self
            .participants
            .find_by_id(participant_id)
            .await?
            .ok_or_else(|| {
                warn!("Cannot attach event '{}': participant {} not found", event.description, participant_id);
                ServiceError::not_found("Participant", participant_id)
            })?;

        event.participants.insert(participant_id);
        let event = self.events.save(event).await?;
        let event_id = event
            .id
            .ok_or_else(|| ServiceError::internal_error("saved event has no id"))?;

        if participant.events.insert(event_id) {
            self.participants.save(participant).await?;
        }

        debug!("Event {} attached to participant {}", event_id, participant_id);
        Ok(event)
    }

    /// Re-attaches `event` to the first participant it already references.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if the event references no participant
    /// or if that participant doesn't exist.
    pub async fn add_affect_even_participant_from_event(&self, event: Event) -> ServiceResult<Event> {
        let Some(participant_id) = event.participants.first().copied() else {
            warn!("Event '{}' has no participant to attach", event.description);
            return Err(ServiceError::not_found(
                "Participant",
                format!("none attached to event '{}'", event.description),
            ));
        };

        self.add_affect_even_participant(event, participant_id).await
    }

    /// Attaches a logistics item to the event with the given description.
    ///
    /// The item is saved with its back-reference set, then the event is saved
    /// as the owner of the association.
    ///
    /// # Returns
    /// The saved logistics item
    pub async fn add_affect_log(
        &self,
        mut logistics: Logistics,
        event_description: &str,
    ) -> ServiceResult<Logistics> {
        let mut event = self
            .events
            .find_by_description(event_description)
            .await?
            .ok_or_else(|| {
                warn!("Cannot attach logistics: event '{}' not found", event_description);
                ServiceError::not_found("Event", event_description)
            })?;
        let event_id = event
            .id
            .ok_or_else(|| ServiceError::internal_error("stored event has no id"))?;

        logistics.event_id = Some(event_id);
        let logistics = self.logistics.save(logistics).await?;

        match event
            .logistics
            .iter_mut()
            .find(|existing| existing.id.is_some() && existing.id == logistics.id)
        {
            Some(existing) => *existing = logistics.clone(),
            None => event.logistics.push(logistics.clone()),
        }
        self.events.save(event).await?;

        debug!("Logistics {:?} attached to event {}", logistics.id, event_id);
        Ok(logistics)
    }

    /// Lists the logistics items of every event starting within `[start, end]`.
    ///
    /// Items keep the order of their events, then their order inside each event.
    pub async fn get_logistics_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Vec<Logistics>> {
        let events = self.events.find_by_start_date_between(start, end).await?;
        let logistics: Vec<Logistics> = events.into_iter().flat_map(|e| e.logistics).collect();
        debug!("{} logistics item(s) between {} and {}", logistics.len(), start, end);
        Ok(logistics)
    }

    /// Recomputes the cost of the events selected by the configured filter.
    pub async fn calcul_cout(&self) -> ServiceResult<Vec<Event>> {
        self.recompute_costs(&self.cost_filter).await
    }

    /// Sets each matching event's cost to the total of its reserved logistics
    /// and saves it once.
    ///
    /// # Returns
    /// The saved events, in the order the store returned them
    pub async fn recompute_costs(&self, filter: &CostFilter) -> ServiceResult<Vec<Event>> {
        let events = self
            .events
            .find_by_participant(&filter.name, &filter.first_name, filter.role)
            .await?;

        let mut updated = Vec::with_capacity(events.len());
        for mut event in events {
            event.cost = event.reserved_cost();
            info!("Cost of event '{}' is {}", event.description, event.cost);
            updated.push(self.events.save(event).await?);
        }

        Ok(updated)
    }
}
