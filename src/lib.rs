pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod entities;
pub mod error;
pub mod geo;
pub mod repository;
pub mod server;

#[cfg(test)]
mod testing;
