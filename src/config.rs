use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use dotenv::dotenv;

use crate::engine::{ArbiterConfig, ScoringWeights};
use crate::error::{config_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub http_addr: SocketAddr,
    /// Decisions and trip events are only logged when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub arbiter: ArbiterConfig,
}

impl Config {
    /// Reads the environment, loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self, Error> {
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ArbiterConfig::default();

        let timeout_ms = parse_or(
            &lookup,
            "DISPATCH_EVALUATION_TIMEOUT_MS",
            defaults.evaluation_timeout.num_milliseconds(),
        )?;

        Ok(Self {
            http_addr: parse_or(
                &lookup,
                "DISPATCH_HTTP_ADDR",
                SocketAddr::from(([127, 0, 0, 1], 8080)),
            )?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            db_max_connections: parse_or(&lookup, "DISPATCH_DB_MAX_CONNECTIONS", 5)?,
            arbiter: ArbiterConfig {
                evaluation_timeout: Duration::milliseconds(timeout_ms),
                radius_km: parse_or(&lookup, "DISPATCH_RADIUS_KM", defaults.radius_km)?,
                weights: ScoringWeights {
                    price: parse_or(&lookup, "DISPATCH_WEIGHT_PRICE", defaults.weights.price)?,
                    time: parse_or(&lookup, "DISPATCH_WEIGHT_TIME", defaults.weights.time)?,
                    proximity: parse_or(
                        &lookup,
                        "DISPATCH_WEIGHT_PROXIMITY",
                        defaults.weights.proximity,
                    )?,
                },
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, fallback: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) if !value.is_empty() => value.parse().map_err(|err| config_error(key, err)),
        _ => Ok(fallback),
    }
}
