use std::sync::Mutex;

use async_trait::async_trait;

use crate::entities::{AcceptedBid, TripEvent};
use crate::error::{unexpected_error, Error};
use crate::repository::{BidRepository, TripEventRepository};

/// Keeps accepted bids in process memory so they can be inspected.
#[derive(Debug, Default)]
pub struct InMemoryBidRepository {
    saved: Mutex<Vec<AcceptedBid>>,
}

impl InMemoryBidRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<AcceptedBid> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BidRepository for InMemoryBidRepository {
    #[tracing::instrument(skip(self))]
    async fn save_accepted_bid(&self, bid: &AcceptedBid) -> Result<(), Error> {
        self.saved
            .lock()
            .map_err(|_| unexpected_error())?
            .push(bid.clone());

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTripEventRepository {
    events: Mutex<Vec<TripEvent>>,
}

impl InMemoryTripEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TripEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TripEventRepository for InMemoryTripEventRepository {
    #[tracing::instrument(skip(self))]
    async fn record_event(&self, event: &TripEvent) -> Result<(), Error> {
        self.events
            .lock()
            .map_err(|_| unexpected_error())?
            .push(event.clone());

        Ok(())
    }
}

#[test]
fn records_in_order() {
    use chrono::{TimeZone, Utc};
    use tokio_test::block_on;

    use crate::entities::TripState;

    let repo = InMemoryTripEventRepository::new();

    for (state, notes) in [
        (TripState::Active, "trip started"),
        (TripState::Complete, "trip completed"),
    ] {
        let event = TripEvent {
            trip_id: "trip-1".into(),
            state,
            occurred_at: Utc.timestamp_opt(0, 0).unwrap(),
            notes: notes.into(),
        };
        block_on(repo.record_event(&event)).unwrap();
    }

    let states: Vec<TripState> = repo.events().iter().map(|e| e.state).collect();
    assert_eq!(states, vec![TripState::Active, TripState::Complete]);
}
