use super::Engine;

use async_trait::async_trait;
use futures::future;

use crate::{
    api::BidAPI,
    entities::{Bid, BidRequest},
    error::Error,
};

#[async_trait]
impl BidAPI for Engine {
    // dropping this future abandons the evaluation, so no separate cancel signal is needed
    #[tracing::instrument(skip_all, fields(rider_id = %request.rider_id))]
    async fn evaluate_bids(&self, request: BidRequest, bids: Vec<Bid>) -> Result<Option<Bid>, Error> {
        self.arbiter.evaluate(future::pending(), request, bids).await
    }
}
