//! Data models for the skyvoice weather skill
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: the location key forecasts are fetched and cached under
//! - Forecast: provider forecast with its daily series
//! - Request: parsed queries and resolved locations
//! - Pollen: auxiliary pollen outlook

pub mod coordinate;
pub mod forecast;
pub mod pollen;
pub mod request;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use forecast::{DataBlock, DataPoint, Forecast};
pub use pollen::{PollenForecast, PollenPeriod};
pub use request::{Condition, Location, UnknownCondition, WeatherRequest};
