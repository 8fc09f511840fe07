use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::seconds;

/// A driver's offer for a trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: String,
    pub driver_id: String,
    pub trip_id: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "seconds")]
    pub eta: Duration,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Bid {
    /// A bid without an expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now,
            None => false,
        }
    }
}

/// Rider-side bounds a bid must satisfy. Zero disables a bound.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BidRequest {
    pub rider_id: String,
    pub trip_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(with = "seconds", default = "Duration::zero")]
    pub max_eta: Duration,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AcceptedBid {
    pub bid_id: String,
    pub trip_id: String,
    pub driver_id: String,
    pub price: f64,
    pub accepted_at: DateTime<Utc>,
}

impl AcceptedBid {
    pub fn new(bid: &Bid, accepted_at: DateTime<Utc>) -> Self {
        Self {
            bid_id: bid.id.clone(),
            trip_id: bid.trip_id.clone(),
            driver_id: bid.driver_id.clone(),
            price: bid.price,
            accepted_at,
        }
    }
}

#[test]
fn bid_expiry_is_exclusive() {
    use chrono::TimeZone;

    let now = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
    let mut bid = Bid {
        id: "b1".into(),
        driver_id: "d1".into(),
        trip_id: "t1".into(),
        price: 10.0,
        latitude: 0.0,
        longitude: 0.0,
        eta: Duration::minutes(5),
        expires_at: None,
    };

    assert!(!bid.is_expired(now));

    bid.expires_at = Some(now);
    assert!(bid.is_expired(now));

    bid.expires_at = Some(now + Duration::seconds(1));
    assert!(!bid.is_expired(now));
}

#[test]
fn bid_request_wire_format() {
    let request: BidRequest = serde_json::from_value(serde_json::json!({
        "rider_id": "r1",
        "trip_id": "t1",
        "latitude": 1.5,
        "longitude": -2.0,
        "max_eta": 1800
    }))
    .unwrap();

    assert_eq!(request.max_eta, Duration::minutes(30));
    assert_eq!(request.max_price, 0.0);
}
