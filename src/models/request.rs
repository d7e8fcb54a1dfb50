//! Parsed weather queries and the resolved location they refer to

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::Coordinate;

/// What the user asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Low,
    High,
    Summary,
    Pollen,
}

impl Condition {
    /// Word used for this condition in spoken answers
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Low => "low",
            Condition::High => "high",
            Condition::Summary => "summary",
            Condition::Pollen => "pollen",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown weather condition '{0}'")]
pub struct UnknownCondition(pub String);

impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "lowest" | "min" => Ok(Condition::Low),
            "high" | "highest" | "max" => Ok(Condition::High),
            "summary" | "forecast" | "weather" => Ok(Condition::Summary),
            "pollen" | "allergies" => Ok(Condition::Pollen),
            _ => Err(UnknownCondition(s.to_string())),
        }
    }
}

/// A resolved location: where to fetch and which clock to speak in
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub coordinate: Coordinate,
    pub timezone: Tz,
}

impl Location {
    #[must_use]
    pub fn new(coordinate: Coordinate, timezone: Tz) -> Self {
        Self {
            coordinate,
            timezone,
        }
    }
}

/// A parsed query: condition plus an inclusive day range
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub condition: Condition,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// When the query arrived; "today" is derived from this
    pub received_at: DateTime<Utc>,
}

impl WeatherRequest {
    /// Request covering `start..=end`, received now
    #[must_use]
    pub fn new(condition: Condition, start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self {
            condition,
            start,
            end,
            received_at: Utc::now(),
        }
    }

    /// Request for a single day
    #[must_use]
    pub fn for_day(condition: Condition, day: DateTime<Tz>) -> Self {
        Self::new(condition, day, day)
    }

    #[must_use]
    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = received_at;
        self
    }

    /// Timezone the request's days are expressed in
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Current local date in the request's timezone
    #[must_use]
    pub fn today(&self) -> chrono::NaiveDate {
        self.timezone()
            .from_utc_datetime(&self.received_at.naive_utc())
            .date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("low", Condition::Low)]
    #[case("High", Condition::High)]
    #[case(" max ", Condition::High)]
    #[case("forecast", Condition::Summary)]
    #[case("allergies", Condition::Pollen)]
    fn test_parse_condition(#[case] input: &str, #[case] expected: Condition) {
        assert_eq!(input.parse::<Condition>(), Ok(expected));
    }

    #[test]
    fn test_parse_unknown_condition() {
        let err = "humidity".parse::<Condition>().unwrap_err();
        assert_eq!(err, UnknownCondition("humidity".to_string()));
    }

    #[test]
    fn test_condition_word() {
        assert_eq!(Condition::Low.to_string(), "low");
        assert_eq!(Condition::High.to_string(), "high");
    }

    #[test]
    fn test_today_uses_request_timezone() {
        let tz: Tz = "America/Los_Angeles".parse().unwrap();
        let day = tz.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        // 2024-01-02 03:00 UTC is still Jan 1 in Los Angeles
        let received = Utc.with_ymd_and_hms(2024, 1, 2, 3, 0, 0).unwrap();
        let request = WeatherRequest::for_day(Condition::Low, day).with_received_at(received);

        assert_eq!(
            request.today(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }
}
