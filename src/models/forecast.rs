//! Weather forecast model as returned by the forecast provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather forecast for one coordinate.
///
/// Treated as an immutable value once fetched; the cache stores it
/// verbatim and hands back an equal value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// IANA timezone name reported by the provider
    #[serde(default)]
    pub timezone: String,
    /// Conditions at request time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currently: Option<DataPoint>,
    /// One data point per day, in chronological order
    #[serde(default)]
    pub daily: DataBlock,
}

/// A summarised series of data points
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DataBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

/// Weather conditions for a single moment or day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    /// Unix timestamp (seconds); for daily points, local midnight
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Overnight low
    #[serde(default)]
    pub temperature_low: f64,
    /// Daytime high
    #[serde(default)]
    pub temperature_high: f64,
    /// Probability of precipitation (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip_type: Option<String>,
    /// Relative humidity (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
}

impl DataPoint {
    /// Timestamp of this data point as a UTC instant
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.time, 0).unwrap_or_default()
    }
}

impl Forecast {
    /// Daily data points in provider order
    #[must_use]
    pub fn daily_points(&self) -> &[DataPoint] {
        &self.daily.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER_BODY: &str = r#"{
        "latitude": 40.7,
        "longitude": -74.0,
        "timezone": "America/New_York",
        "currently": {"time": 1704110400, "summary": "Clear", "temperature": 31.4},
        "daily": {
            "summary": "Light rain on Tuesday.",
            "icon": "rain",
            "data": [
                {"time": 1704085200, "summary": "Clear throughout the day.", "temperatureLow": 10.2, "temperatureHigh": 20.7, "precipProbability": 0.05},
                {"time": 1704171600, "temperatureLow": 5.0, "temperatureHigh": 25.0, "precipType": "rain", "unknownField": 3}
            ]
        },
        "flags": {"units": "us"}
    }"#;

    #[test]
    fn test_decode_provider_body() {
        let forecast: Forecast = serde_json::from_str(PROVIDER_BODY).unwrap();

        assert_eq!(forecast.timezone, "America/New_York");
        assert_eq!(forecast.daily_points().len(), 2);
        assert_eq!(forecast.daily.data[0].temperature_low, 10.2);
        assert_eq!(forecast.daily.data[1].temperature_high, 25.0);
        assert_eq!(forecast.daily.data[1].precip_type.as_deref(), Some("rain"));
        assert_eq!(forecast.currently.unwrap().temperature, Some(31.4));
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let forecast: Forecast = serde_json::from_str(PROVIDER_BODY).unwrap();
        let encoded = serde_json::to_vec(&forecast).unwrap();
        let decoded: Forecast = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded, forecast);
    }

    #[test]
    fn test_data_point_timestamp() {
        let point = DataPoint {
            time: 1_704_067_200,
            ..DataPoint::default()
        };
        assert_eq!(point.timestamp().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }
}
