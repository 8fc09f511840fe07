use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::{
    clock::Clock,
    entities::{TripAction, TripEvent, TripMetrics, TripState},
    error::{invalid_transition_error, Error},
    repository::TripEventRepository,
};

/// Timing state of a known trip. A trip without a record is pending.
#[derive(Clone, Debug)]
struct TripRecord {
    state: TripState,
    started_at: DateTime<Utc>,
    last_resumed: DateTime<Utc>,
    last_paused: Option<DateTime<Utc>>,
    total_active: Duration,
    total_paused: Duration,
}

impl TripRecord {
    fn start(now: DateTime<Utc>) -> Self {
        Self {
            state: TripState::Active,
            started_at: now,
            last_resumed: now,
            last_paused: None,
            total_active: Duration::zero(),
            total_paused: Duration::zero(),
        }
    }

    /// A known trip can never be started again.
    fn apply(&mut self, action: TripAction, now: DateTime<Utc>) -> Result<(), Error> {
        match action {
            TripAction::Start => Err(invalid_transition_error()),
            TripAction::Pause => self.pause(now),
            TripAction::Resume => self.resume(now),
            TripAction::Cancel => self.cancel(now),
            TripAction::Complete => self.complete(now),
        }
    }

    fn pause(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        match self.state {
            TripState::Active => {
                self.total_active = self.total_active + (now - self.last_resumed);
                self.last_paused = Some(now);
                self.state = TripState::Paused;
                Ok(())
            }
            _ => Err(invalid_transition_error()),
        }
    }

    fn resume(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        match (self.state, self.last_paused) {
            (TripState::Paused, Some(paused_at)) => {
                self.total_paused = self.total_paused + (now - paused_at);
                self.last_resumed = now;
                self.state = TripState::Active;
                Ok(())
            }
            _ => Err(invalid_transition_error()),
        }
    }

    /// Flushes whichever interval is open.
    fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        match (self.state, self.last_paused) {
            (TripState::Active, _) => {
                self.total_active = self.total_active + (now - self.last_resumed);
            }
            (TripState::Paused, Some(paused_at)) => {
                self.total_paused = self.total_paused + (now - paused_at);
            }
            _ => return Err(invalid_transition_error()),
        }

        self.state = TripState::Canceled;
        Ok(())
    }

    /// A paused trip has to resume before it can complete.
    fn complete(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        match self.state {
            TripState::Active => {
                self.total_active = self.total_active + (now - self.last_resumed);
                self.state = TripState::Complete;
                Ok(())
            }
            _ => Err(invalid_transition_error()),
        }
    }

    fn metrics(&self) -> TripMetrics {
        TripMetrics {
            total_active: self.total_active,
            total_paused: self.total_paused,
            started_at: self.started_at,
        }
    }
}

fn event_notes(action: TripAction) -> &'static str {
    match action {
        TripAction::Start => "trip started",
        TripAction::Pause => "trip paused",
        TripAction::Resume => "trip resumed",
        TripAction::Cancel => "trip canceled",
        TripAction::Complete => "trip completed",
    }
}

/// Owns the lifecycle state of every trip it has seen.
///
/// Transitions hold the write lock until their event is recorded, so events of
/// a trip are emitted in transition order. A failed event write does not undo
/// the transition.
pub struct TripTracker {
    trips: RwLock<HashMap<String, TripRecord>>,
    repo: Arc<dyn TripEventRepository>,
    clock: Arc<dyn Clock>,
}

impl TripTracker {
    pub fn new(repo: Arc<dyn TripEventRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            trips: RwLock::new(HashMap::new()),
            repo,
            clock,
        }
    }

    pub async fn start(&self, trip_id: &str) -> Result<(), Error> {
        self.apply(trip_id, TripAction::Start).await
    }

    pub async fn pause(&self, trip_id: &str) -> Result<(), Error> {
        self.apply(trip_id, TripAction::Pause).await
    }

    pub async fn resume(&self, trip_id: &str) -> Result<(), Error> {
        self.apply(trip_id, TripAction::Resume).await
    }

    pub async fn cancel(&self, trip_id: &str) -> Result<(), Error> {
        self.apply(trip_id, TripAction::Cancel).await
    }

    pub async fn complete(&self, trip_id: &str) -> Result<(), Error> {
        self.apply(trip_id, TripAction::Complete).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn apply(&self, trip_id: &str, action: TripAction) -> Result<(), Error> {
        let mut trips = self.trips.write().await;
        let now = self.clock.now();

        let state = match trips.get_mut(trip_id) {
            Some(record) => {
                record.apply(action, now)?;
                record.state
            }
            None if action == TripAction::Start => {
                trips.insert(trip_id.to_string(), TripRecord::start(now));
                TripState::Active
            }
            None => return Err(invalid_transition_error()),
        };

        let event = TripEvent {
            trip_id: trip_id.to_string(),
            state,
            occurred_at: now,
            notes: event_notes(action).into(),
        };

        self.repo
            .record_event(&event)
            .await
            .map_err(|err| err.context(&format!("record {} event", state.name())))
    }

    pub async fn metrics_for(&self, trip_id: &str) -> Option<TripMetrics> {
        self.trips.read().await.get(trip_id).map(TripRecord::metrics)
    }
}
