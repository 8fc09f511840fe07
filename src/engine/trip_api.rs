use super::Engine;

use async_trait::async_trait;

use crate::{
    api::TripAPI,
    entities::{TripAction, TripMetrics},
    error::Error,
};

#[async_trait]
impl TripAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn apply_action(&self, trip_id: &str, action: &str) -> Result<(), Error> {
        let action: TripAction = action.parse()?;

        self.tracker.apply(trip_id, action).await
    }

    #[tracing::instrument(skip(self))]
    async fn trip_metrics(&self, trip_id: &str) -> Result<Option<TripMetrics>, Error> {
        Ok(self.tracker.metrics_for(trip_id).await)
    }
}
