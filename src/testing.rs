use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::future::{self, BoxFuture, FutureExt};

use crate::clock::Clock;
use crate::entities::{AcceptedBid, TripEvent};
use crate::error::{upstream_error, Error};
use crate::repository::{BidRepository, TripEventRepository};

/// Always reports the same instant. Deadlines never fire unless asked to.
pub struct FixedClock {
    now: DateTime<Utc>,
    deadline_fired: bool,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            deadline_fired: false,
        }
    }

    pub fn with_deadline_fired(mut self) -> Self {
        self.deadline_fired = true;
        self
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn after(&self, _: Duration) -> BoxFuture<'static, ()> {
        if self.deadline_fired {
            future::ready(()).boxed()
        } else {
            future::pending().boxed()
        }
    }
}

/// Hands out the given instants in order, then keeps repeating the last one.
pub struct SequenceClock {
    times: Mutex<VecDeque<DateTime<Utc>>>,
    last: Mutex<DateTime<Utc>>,
}

impl SequenceClock {
    pub fn new(times: Vec<DateTime<Utc>>) -> Self {
        let first = times.first().copied().unwrap_or_else(Utc::now);

        Self {
            times: Mutex::new(times.into()),
            last: Mutex::new(first),
        }
    }
}

impl Clock for SequenceClock {
    fn now(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap();

        if let Some(next) = self.times.lock().unwrap().pop_front() {
            *last = next;
        }

        *last
    }

    fn after(&self, _: Duration) -> BoxFuture<'static, ()> {
        future::pending().boxed()
    }
}

/// Moves one second forward every time it is read.
pub struct TickingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl TickingClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<Utc> {
        self.start + Duration::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }

    fn after(&self, _: Duration) -> BoxFuture<'static, ()> {
        future::pending().boxed()
    }
}

pub struct FailingBidRepository;

#[async_trait]
impl BidRepository for FailingBidRepository {
    async fn save_accepted_bid(&self, _: &AcceptedBid) -> Result<(), Error> {
        Err(upstream_error("connection refused"))
    }
}

pub struct FailingTripEventRepository;

#[async_trait]
impl TripEventRepository for FailingTripEventRepository {
    async fn record_event(&self, _: &TripEvent) -> Result<(), Error> {
        Err(upstream_error("connection refused"))
    }
}
