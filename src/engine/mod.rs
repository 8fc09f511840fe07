mod arbiter;
mod bid_api;
mod tracker;
mod trip_api;

pub use arbiter::{Arbiter, ArbiterConfig, ScoringWeights};
pub use tracker::TripTracker;

use crate::api::API;

/// Composes the bid arbiter and the trip tracker. The two share no state.
pub struct Engine {
    arbiter: Arbiter,
    tracker: TripTracker,
}

impl Engine {
    pub fn new(arbiter: Arbiter, tracker: TripTracker) -> Self {
        Self { arbiter, tracker }
    }
}

impl API for Engine {}
