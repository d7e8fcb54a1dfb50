//! Coordinate model and cache key derivation

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair exactly as the caller spelled it.
///
/// Both halves are kept as strings. No numeric normalization happens, so
/// `"40.7"` and `"40.70"` address different cache entries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: String,
    /// Longitude in decimal degrees
    pub longitude: String,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Field under which this coordinate's forecast is cached
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_cache_key() {
        let coordinate = Coordinate::new("46.8182", "8.2275");
        assert_eq!(coordinate.cache_key(), "46.8182:8.2275");
    }

    #[test]
    fn test_cache_key_keeps_order() {
        let a = Coordinate::new("10", "20");
        let b = Coordinate::new("20", "10");
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_precision_is_not_normalized() {
        let short = Coordinate::new("40.7", "-74");
        let long = Coordinate::new("40.70", "-74.0");
        assert_ne!(short.cache_key(), long.cache_key());
    }

    #[test]
    fn test_display_for_provider_url() {
        let coordinate = Coordinate::new("40.7", "-74.0");
        assert_eq!(coordinate.to_string(), "40.7,-74.0");
    }
}
