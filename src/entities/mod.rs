mod bid;
pub mod seconds;
mod trip;

pub use bid::{AcceptedBid, Bid, BidRequest};
pub use trip::{TripAction, TripEvent, TripMetrics, TripState};
