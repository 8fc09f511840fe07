use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::seconds;
use crate::error::{unknown_action_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripState {
    Active,
    Paused,
    Canceled,
    Complete,
}

impl TripState {
    pub fn name(&self) -> String {
        match self {
            Self::Active => "active".into(),
            Self::Paused => "paused".into(),
            Self::Canceled => "canceled".into(),
            Self::Complete => "complete".into(),
        }
    }
}

/// Lifecycle action keyword accepted from callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripAction {
    Start,
    Pause,
    Resume,
    Cancel,
    Complete,
}

impl FromStr for TripAction {
    type Err = Error;

    fn from_str(action: &str) -> Result<Self, Self::Err> {
        match action {
            "start" => Ok(Self::Start),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "cancel" => Ok(Self::Cancel),
            "complete" => Ok(Self::Complete),
            _ => Err(unknown_action_error(action)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripEvent {
    pub trip_id: String,
    pub state: TripState,
    pub occurred_at: DateTime<Utc>,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripMetrics {
    #[serde(rename = "total_active_secs", with = "seconds")]
    pub total_active: Duration,
    #[serde(rename = "total_paused_secs", with = "seconds")]
    pub total_paused: Duration,
    pub started_at: DateTime<Utc>,
}

#[test]
fn parse_actions() {
    assert_eq!("pause".parse::<TripAction>().unwrap(), TripAction::Pause);
    assert_eq!("complete".parse::<TripAction>().unwrap(), TripAction::Complete);

    let err = "Start".parse::<TripAction>().unwrap_err();
    assert!(err.is_unknown_action_error());
}

#[test]
fn metrics_wire_format() {
    use chrono::TimeZone;

    let metrics = TripMetrics {
        total_active: Duration::seconds(180),
        total_paused: Duration::seconds(60),
        started_at: Utc.timestamp_opt(0, 0).unwrap(),
    };

    let value = serde_json::to_value(&metrics).unwrap();
    assert_eq!(value["total_active_secs"], 180);
    assert_eq!(value["total_paused_secs"], 60);
}

#[test]
fn pending_is_not_a_wire_state() {
    assert_eq!(serde_json::to_value(TripState::Paused).unwrap(), "paused");
    assert!(serde_json::from_str::<TripState>("\"pending\"").is_err());
}
