use std::sync::Arc;

use dispatch::clock::{Clock, SystemClock};
use dispatch::config::Config;
use dispatch::db::{PgBidRepository, PgPool, PgTripEventRepository};
use dispatch::engine::{Arbiter, Engine, TripTracker};
use dispatch::error::Error;
use dispatch::repository::log::{LogBidRepository, LogTripEventRepository};
use dispatch::repository::{BidRepository, TripEventRepository};
use dispatch::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (bids, events) = match &config.database_url {
        Some(url) => {
            let PgPool(pool) = PgPool::new(url, config.db_max_connections).await?;

            let bids: Arc<dyn BidRepository> = Arc::new(PgBidRepository::new(pool.clone()).await?);
            let events: Arc<dyn TripEventRepository> =
                Arc::new(PgTripEventRepository::new(pool).await?);

            (bids, events)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, decisions and trip events are only logged");

            let bids: Arc<dyn BidRepository> = Arc::new(LogBidRepository);
            let events: Arc<dyn TripEventRepository> = Arc::new(LogTripEventRepository);

            (bids, events)
        }
    };

    let engine = Engine::new(
        Arbiter::new(bids, clock.clone(), config.arbiter.clone()),
        TripTracker::new(events, clock),
    );

    serve(engine, config.http_addr).await
}
