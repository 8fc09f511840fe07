use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::{self, FutureExt};
use tokio::task::AbortHandle;

use crate::{
    clock::Clock,
    entities::{AcceptedBid, Bid, BidRequest},
    error::{deadline_exceeded_error, evaluation_canceled_error, unexpected_error, Error},
    geo,
    repository::BidRepository,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ScoringWeights {
    pub price: f64,
    pub time: f64,
    pub proximity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            price: 0.45,
            time: 0.35,
            proximity: 0.20,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ArbiterConfig {
    /// Zero disables the deadline.
    pub evaluation_timeout: Duration,
    /// Zero or negative disables the radius filter.
    pub radius_km: f64,
    pub weights: ScoringWeights,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            evaluation_timeout: Duration::seconds(3),
            radius_km: 5.0,
            weights: ScoringWeights::default(),
        }
    }
}

/// Picks the best bid for a rider and persists it.
#[derive(Clone)]
pub struct Arbiter {
    repo: Arc<dyn BidRepository>,
    clock: Arc<dyn Clock>,
    config: ArbiterConfig,
}

impl Arbiter {
    pub fn new(repo: Arc<dyn BidRepository>, clock: Arc<dyn Clock>, config: ArbiterConfig) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    /// Runs filter, score, select and persist on a separate task and races it
    /// against the evaluation deadline and `cancel`.
    ///
    /// `Ok(None)` means no bid satisfied the request. When the deadline or
    /// `cancel` wins, the pipeline is abandoned: it is aborted and, if it is
    /// still running, it will not persist a decision.
    #[tracing::instrument(skip_all, fields(trip_id = %request.trip_id, bids = bids.len()))]
    pub async fn evaluate<C>(
        &self,
        cancel: C,
        request: BidRequest,
        bids: Vec<Bid>,
    ) -> Result<Option<Bid>, Error>
    where
        C: Future<Output = ()> + Send,
    {
        let abandoned = Arc::new(AtomicBool::new(false));

        let arbiter = self.clone();
        let flag = abandoned.clone();
        let mut handle =
            tokio::spawn(async move { arbiter.rank_and_select(request, bids, flag).await });

        // dropping the guard abandons the pipeline, including when the caller drops this future
        let mut guard = AbandonOnDrop {
            abandoned,
            abort: handle.abort_handle(),
            armed: true,
        };

        let deadline = if self.config.evaluation_timeout > Duration::zero() {
            self.clock.after(self.config.evaluation_timeout)
        } else {
            future::pending().boxed()
        };

        tokio::pin!(cancel);

        tokio::select! {
            biased;

            joined = &mut handle => {
                guard.armed = false;

                joined.unwrap_or_else(|err| {
                    tracing::error!("bid evaluation task failed: {:?}", err);
                    Err(unexpected_error())
                })
            }
            _ = &mut cancel => {
                tracing::warn!("bid evaluation canceled by caller");
                Err(evaluation_canceled_error())
            }
            _ = deadline => {
                tracing::warn!("bid evaluation deadline exceeded");
                Err(deadline_exceeded_error())
            }
        }
    }

    async fn rank_and_select(
        &self,
        request: BidRequest,
        bids: Vec<Bid>,
        abandoned: Arc<AtomicBool>,
    ) -> Result<Option<Bid>, Error> {
        let candidates = self.filter_bids(&request, bids, self.clock.now());

        if candidates.is_empty() {
            tracing::info!("no bids satisfied all constraints");
            return Ok(None);
        }

        let winner = match self.select_winner(&request, candidates) {
            Some(winner) => winner,
            None => return Ok(None),
        };

        if abandoned.load(Ordering::SeqCst) {
            tracing::warn!("evaluation abandoned, discarding winner {}", winner.id);
            return Ok(None);
        }

        let accepted = AcceptedBid::new(&winner, self.clock.now());

        self.repo
            .save_accepted_bid(&accepted)
            .await
            .map_err(|err| err.context("save accepted bid"))?;

        tracing::info!("accepted bid {} from driver {}", winner.id, winner.driver_id);

        Ok(Some(winner))
    }

    fn filter_bids(&self, request: &BidRequest, bids: Vec<Bid>, now: DateTime<Utc>) -> Vec<Bid> {
        bids.into_iter()
            .filter(|bid| {
                if bid.is_expired(now) {
                    return false;
                }

                if request.max_price > 0.0 && bid.price > request.max_price {
                    return false;
                }

                if request.max_eta > Duration::zero() && bid.eta > request.max_eta {
                    return false;
                }

                self.config.radius_km <= 0.0
                    || geo::within_radius(
                        request.latitude,
                        request.longitude,
                        bid.latitude,
                        bid.longitude,
                        self.config.radius_km,
                    )
            })
            .collect()
    }

    /// Highest score wins, the earliest bid wins a tie. A non-finite score
    /// ranks below every finite one.
    fn select_winner(&self, request: &BidRequest, candidates: Vec<Bid>) -> Option<Bid> {
        let mut best: Option<(f64, Bid)> = None;

        for bid in candidates {
            let score = self.score(request, &bid);
            let score = if score.is_finite() {
                score
            } else {
                f64::NEG_INFINITY
            };

            match &best {
                Some((best_score, _)) if score <= *best_score => {}
                _ => best = Some((score, bid)),
            }
        }

        best.map(|(_, bid)| bid)
    }

    fn score(&self, request: &BidRequest, bid: &Bid) -> f64 {
        let price = if request.max_price > 0.0 {
            (request.max_price - bid.price) / request.max_price
        } else {
            1.0
        };

        let time = if request.max_eta > Duration::zero() {
            let max_eta = request.max_eta.num_milliseconds() as f64;
            (max_eta - bid.eta.num_milliseconds() as f64) / max_eta
        } else {
            1.0
        };

        let distance = geo::distance(
            request.latitude,
            request.longitude,
            bid.latitude,
            bid.longitude,
        );

        let weights = &self.config.weights;

        weights.price * price.clamp(0.0, 1.0)
            + weights.time * time.clamp(0.0, 1.0)
            + weights.proximity * geo::proximity_score(distance)
    }
}

struct AbandonOnDrop {
    abandoned: Arc<AtomicBool>,
    abort: AbortHandle,
    armed: bool,
}

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.abandoned.store(true, Ordering::SeqCst);
            self.abort.abort();
        }
    }
}
