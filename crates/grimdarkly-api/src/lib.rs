// grimdarkly-api: Async Rust client for the Grimdarkly catalog API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod factions;
mod units;
mod weapons;

pub use client::CatalogClient;
pub use error::Error;
pub use transport::TransportConfig;
