use async_trait::async_trait;

use crate::entities::{AcceptedBid, TripEvent};
use crate::error::Error;
use crate::repository::{BidRepository, TripEventRepository};

/// Writes accepted bids to the log and keeps nothing. Used when no database is configured.
#[derive(Debug, Default)]
pub struct LogBidRepository;

#[async_trait]
impl BidRepository for LogBidRepository {
    async fn save_accepted_bid(&self, bid: &AcceptedBid) -> Result<(), Error> {
        tracing::info!(
            "accepted bid {} for trip {} at {}",
            bid.bid_id,
            bid.trip_id,
            bid.accepted_at
        );

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogTripEventRepository;

#[async_trait]
impl TripEventRepository for LogTripEventRepository {
    async fn record_event(&self, event: &TripEvent) -> Result<(), Error> {
        tracing::info!(
            "trip {} {} at {}: {}",
            event.trip_id,
            event.state.name(),
            event.occurred_at,
            event.notes
        );

        Ok(())
    }
}
