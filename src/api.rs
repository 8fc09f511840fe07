use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{Bid, BidRequest, TripMetrics};
use crate::error::Error;

#[async_trait]
pub trait BidAPI {
    /// `Ok(None)` when no bid satisfied the request.
    async fn evaluate_bids(&self, request: BidRequest, bids: Vec<Bid>) -> Result<Option<Bid>, Error>;
}

#[async_trait]
pub trait TripAPI {
    /// Applies one of `start`, `pause`, `resume`, `cancel` or `complete`.
    async fn apply_action(&self, trip_id: &str, action: &str) -> Result<(), Error>;
    async fn trip_metrics(&self, trip_id: &str) -> Result<Option<TripMetrics>, Error>;
}

pub trait API: BidAPI + TripAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
