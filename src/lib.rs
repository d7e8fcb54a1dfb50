//! `skyvoice` - spoken weather answers backed by a write-through forecast cache
//!
//! This library provides the forecast cache over an atomic key-value store,
//! the write-through service that fills it from the weather provider, and
//! the speakers that turn a forecast into a one-sentence answer.

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod provider;
pub mod skill;
pub mod speech;
pub mod write_through;

// Re-export core types for public API
pub use cache::{FjallStore, ForecastCache, ForecastStore, MemoryStore};
pub use config::SkyvoiceConfig;
pub use error::{ForecastError, ProviderError, SkyvoiceError, StoreError};
pub use models::{Condition, Coordinate, Forecast, Location, PollenForecast, WeatherRequest};
pub use provider::{DarkSkyClient, ForecastProvider};
pub use skill::WeatherSkill;
pub use speech::Speaker;
pub use write_through::WriteThrough;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkyvoiceError>;
