pub mod log;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::entities::{AcceptedBid, TripEvent};
use crate::error::Error;

/// Persists the winning bid of an arbitration.
#[async_trait]
pub trait BidRepository: Send + Sync {
    async fn save_accepted_bid(&self, bid: &AcceptedBid) -> Result<(), Error>;
}

/// Persists trip lifecycle events.
#[async_trait]
pub trait TripEventRepository: Send + Sync {
    async fn record_event(&self, event: &TripEvent) -> Result<(), Error>;
}
