use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres};
use uuid::Uuid;

use crate::entities::{AcceptedBid, TripEvent};
use crate::error::Error;
use crate::repository::{BidRepository, TripEventRepository};

type Database = Postgres;

// A bid may be accepted more than once when a caller retries after a deadline.
const CREATE_ACCEPTED_BIDS: &str = "CREATE TABLE IF NOT EXISTS accepted_bids (id UUID PRIMARY KEY, bid_id VARCHAR NOT NULL, trip_id VARCHAR NOT NULL, driver_id VARCHAR NOT NULL, price DOUBLE PRECISION NOT NULL, accepted_at TIMESTAMPTZ NOT NULL)";

pub struct PgPool(pub Pool<Database>);

impl PgPool {
    #[tracing::instrument(name = "PgPool::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Ok(Self(pool))
    }
}

#[derive(Debug)]
pub struct PgBidRepository {
    pool: Pool<Database>,
}

impl PgBidRepository {
    #[tracing::instrument(name = "PgBidRepository::new", skip_all)]
    pub async fn new(pool: Pool<Database>) -> Result<Self, Error> {
        pool.execute(CREATE_ACCEPTED_BIDS).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl BidRepository for PgBidRepository {
    #[tracing::instrument(skip(self))]
    async fn save_accepted_bid(&self, bid: &AcceptedBid) -> Result<(), Error> {
        self.pool
            .execute(
                sqlx::query(
                    "INSERT INTO accepted_bids (id, bid_id, trip_id, driver_id, price, accepted_at) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(Uuid::new_v4())
                .bind(&bid.bid_id)
                .bind(&bid.trip_id)
                .bind(&bid.driver_id)
                .bind(bid.price)
                .bind(bid.accepted_at),
            )
            .await?;

        Ok(())
    }
}

#[derive(Debug)]
pub struct PgTripEventRepository {
    pool: Pool<Database>,
}

impl PgTripEventRepository {
    #[tracing::instrument(name = "PgTripEventRepository::new", skip_all)]
    pub async fn new(pool: Pool<Database>) -> Result<Self, Error> {
        pool.execute(
            "CREATE TABLE IF NOT EXISTS trip_events (id UUID PRIMARY KEY, trip_id VARCHAR NOT NULL, state VARCHAR NOT NULL, occurred_at TIMESTAMPTZ NOT NULL, notes VARCHAR NOT NULL)",
        )
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl TripEventRepository for PgTripEventRepository {
    #[tracing::instrument(skip(self))]
    async fn record_event(&self, event: &TripEvent) -> Result<(), Error> {
        self.pool
            .execute(
                sqlx::query(
                    "INSERT INTO trip_events (id, trip_id, state, occurred_at, notes) VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(Uuid::new_v4())
                .bind(&event.trip_id)
                .bind(event.state.name())
                .bind(event.occurred_at)
                .bind(&event.notes),
            )
            .await?;

        Ok(())
    }
}

#[test]
fn accepted_bids_are_keyed_by_row() {
    assert!(CREATE_ACCEPTED_BIDS.contains("id UUID PRIMARY KEY"));
    assert!(CREATE_ACCEPTED_BIDS.contains("bid_id VARCHAR NOT NULL,"));
    assert!(!CREATE_ACCEPTED_BIDS.contains("bid_id VARCHAR PRIMARY KEY"));
}
