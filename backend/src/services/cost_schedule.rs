//! Periodic recomputation of event costs.

use crate::repositories::{EventPort, LogisticsPort, ParticipantPort};
use crate::services::event_services::EventServices;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Runs `calcul_cout` every `period` until `shutdown` resolves.
///
/// The first pass runs immediately. A failed pass is logged and the schedule
/// keeps going.
///
/// # Returns
/// The number of passes that were started
pub async fn run_cost_schedule<E, P, L, F>(
    services: &EventServices<E, P, L>,
    period: Duration,
    shutdown: F,
) -> usize
where
    E: EventPort,
    P: ParticipantPort,
    L: LogisticsPort,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!("Cost schedule started, period {:?}", period);
    let mut passes = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                passes += 1;
                match services.calcul_cout().await {
                    Ok(events) => info!("Cost pass {} updated {} event(s)", passes, events.len()),
                    Err(e) => error!("Cost pass {} failed: {}", passes, e),
                }
            }
        }
    }

    info!("Cost schedule stopped after {} pass(es)", passes);
    passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Event, Logistics};
    use crate::services::test_support::{MockEventPort, MockLogisticsPort, MockParticipantPort};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_schedule_runs_until_shutdown() {
        let events = MockEventPort::default();
        let day = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let mut event = Event::new("Summit", day, day);
        event.logistics.push(Logistics::new("Screens", true, 250.0, 4));
        events.insert_for_participant(event).await;

        let services = EventServices::new(
            events.clone(),
            MockParticipantPort::default(),
            MockLogisticsPort::default(),
        );

        let passes = run_cost_schedule(
            &services,
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_millis(35)),
        )
        .await;

        assert!(passes >= 1);
        let saved = events.saved().await;
        assert_eq!(saved.len(), passes);
        assert!(saved.iter().all(|e| e.cost == 1000.0));
    }

    #[tokio::test]
    async fn test_schedule_stops_immediately_when_already_shut_down() {
        let events = MockEventPort::default();
        let services = EventServices::new(
            events.clone(),
            MockParticipantPort::default(),
            MockLogisticsPort::default(),
        );

        let passes = run_cost_schedule(&services, Duration::from_secs(60), std::future::ready(())).await;

        assert_eq!(passes, 0);
        assert!(events.participant_queries().await.is_empty());
    }
}
